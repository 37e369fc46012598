//! FlowNetwork — validated directed flow network (nodes, edges, flows, sources).
//!
//! Purpose
//! -------
//! Hold the topology consumed by the precision builder: node count, directed
//! edges with distances, per-node flows, and the declared source nodes. All
//! configuration checks happen once, in [`FlowNetwork::new`], so downstream
//! numerics can index freely.
//!
//! Key behaviors
//! -------------
//! - Validate the raw arrays via the helpers in [`validation`](super::validation).
//! - Store a deterministic topological order and per-node inflow lists.
//! - Provide read-only accessors used by the precision builder and gradient
//!   code.
//!
//! Invariants & assumptions
//! ------------------------
//! - `from_e.len() == to_e.len() == dist_e.len() == n_edges`.
//! - Every endpoint and source index is `< n_nodes`.
//! - The edge set is a DAG without self loops.
//! - Every non-source node has at least one incoming edge with positive
//!   distance, so its conditional variance is positive for every `theta > 0`.
//!
//! Conventions
//! -----------
//! - Indices are 0-based. Edge `e` points from `from_e[e]` (upstream) to
//!   `to_e[e]` (downstream).
//! - This type performs no I/O; loading topologies from files is a caller
//!   concern.
use crate::network::{
    errors::{NetworkError, NetworkResult},
    validation::{
        topological_order, validate_distances, validate_edge_lengths, validate_endpoints,
        validate_flows, validate_inflow, validate_sources,
    },
};
use ndarray::Array1;

/// FlowNetwork — directed flow network with validated topology.
///
/// Purpose
/// -------
/// Represent the node/edge structure of a stream network together with the
/// flows and distances that parameterize the conditional-autoregressive
/// precision matrix.
///
/// Fields
/// ------
/// - `from_e`, `to_e`: `Vec<usize>`
///   Upstream and downstream node of each edge.
/// - `dist_e`: `Array1<f64>`
///   Non-negative edge distances.
/// - `flow_n`: `Array1<f64>`
///   Strictly positive node flows; `flow_n.len()` is the node count.
/// - `source_s`: `Vec<usize>`
///   Declared source nodes, as supplied (duplicates allowed).
/// - `is_source`: `Vec<bool>`
///   Per-node membership mask derived from `source_s`.
/// - `order`: `Vec<usize>`
///   Topological order (upstream first).
/// - `inflow`: `Vec<Vec<usize>>`
///   Incoming edge indices per node, in edge order.
///
/// Invariants
/// ----------
/// - See the module documentation; all invariants are established by
///   [`FlowNetwork::new`] and fields are private.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowNetwork {
    from_e: Vec<usize>,
    to_e: Vec<usize>,
    dist_e: Array1<f64>,
    flow_n: Array1<f64>,
    source_s: Vec<usize>,
    is_source: Vec<bool>,
    order: Vec<usize>,
    inflow: Vec<Vec<usize>>,
}

impl FlowNetwork {
    /// Construct a validated [`FlowNetwork`].
    ///
    /// Parameters
    /// ----------
    /// - `from_e`, `to_e`: `Vec<usize>`
    ///   Edge endpoints (0-based).
    /// - `dist_e`: `Array1<f64>`
    ///   Edge distances; finite and `>= 0`.
    /// - `flow_n`: `Array1<f64>`
    ///   Node flows; finite and `> 0`. Defines `n_nodes = flow_n.len()`.
    /// - `source_s`: `Vec<usize>`
    ///   Node indices without upstream conditioning.
    ///
    /// Returns
    /// -------
    /// `NetworkResult<FlowNetwork>`
    ///
    /// Errors
    /// ------
    /// - `NetworkError::EmptyNetwork` when `flow_n` is empty.
    /// - Length, bound, attribute, and structure errors from the
    ///   [`validation`](super::validation) helpers, checked in that order.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::array;
    /// # use rust_streamnet::network::FlowNetwork;
    /// let net = FlowNetwork::new(vec![0, 1], vec![1, 2], array![1.0, 1.0],
    ///     array![1.0, 1.0, 1.0], vec![0]).unwrap();
    /// assert_eq!(net.n_nodes(), 3);
    /// assert_eq!(net.order(), &[0, 1, 2]);
    /// ```
    pub fn new(
        from_e: Vec<usize>, to_e: Vec<usize>, dist_e: Array1<f64>, flow_n: Array1<f64>,
        source_s: Vec<usize>,
    ) -> NetworkResult<Self> {
        let n_nodes = flow_n.len();
        if n_nodes == 0 {
            return Err(NetworkError::EmptyNetwork);
        }
        validate_edge_lengths(&from_e, &to_e, &dist_e)?;
        validate_endpoints(&from_e, &to_e, n_nodes)?;
        validate_distances(&dist_e)?;
        validate_flows(&flow_n)?;
        let is_source = validate_sources(&source_s, n_nodes)?;
        let order = topological_order(&from_e, &to_e, n_nodes)?;
        validate_inflow(&to_e, &dist_e, &is_source)?;

        let mut inflow: Vec<Vec<usize>> = vec![Vec::new(); n_nodes];
        for (edge, &to) in to_e.iter().enumerate() {
            inflow[to].push(edge);
        }

        Ok(FlowNetwork { from_e, to_e, dist_e, flow_n, source_s, is_source, order, inflow })
    }

    /// Network of `n_nodes` isolated source nodes (no edges).
    pub fn isolated(n_nodes: usize) -> NetworkResult<Self> {
        FlowNetwork::new(
            Vec::new(),
            Vec::new(),
            Array1::zeros(0),
            Array1::ones(n_nodes),
            (0..n_nodes).collect(),
        )
    }

    pub fn n_nodes(&self) -> usize {
        self.flow_n.len()
    }

    pub fn n_edges(&self) -> usize {
        self.from_e.len()
    }

    pub fn from_e(&self) -> &[usize] {
        &self.from_e
    }

    pub fn to_e(&self) -> &[usize] {
        &self.to_e
    }

    pub fn dist_e(&self) -> &Array1<f64> {
        &self.dist_e
    }

    pub fn flow_n(&self) -> &Array1<f64> {
        &self.flow_n
    }

    pub fn source_s(&self) -> &[usize] {
        &self.source_s
    }

    /// Whether `node` is a declared source.
    pub fn is_source(&self, node: usize) -> bool {
        self.is_source[node]
    }

    /// Topological order of the nodes (upstream first).
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Incoming edge indices of `node`.
    pub fn inflow(&self, node: usize) -> &[usize] {
        &self.inflow[node]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Successful construction of chain and confluence networks.
    // - Propagation of configuration errors from the validation helpers.
    // - The isolated-node constructor.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that a confluence network stores inflow lists and order.
    //
    // Given
    // -----
    // - Edges 0 -> 2, 1 -> 2, 2 -> 3; sources {0, 1}.
    //
    // Expect
    // ------
    // - Node 2 has inflow edges [0, 1]; order is [0, 1, 2, 3].
    fn new_builds_inflow_lists_for_confluence() {
        let net = FlowNetwork::new(
            vec![0, 1, 2],
            vec![2, 2, 3],
            array![1.0, 2.0, 0.5],
            array![1.0, 3.0, 4.0, 4.0],
            vec![0, 1],
        )
        .unwrap();
        assert_eq!(net.n_edges(), 3);
        assert_eq!(net.inflow(2), &[0, 1]);
        assert_eq!(net.inflow(0), &[] as &[usize]);
        assert_eq!(net.order(), &[0, 1, 2, 3]);
        assert!(net.is_source(1));
        assert!(!net.is_source(3));
    }

    #[test]
    // Purpose
    // -------
    // Verify that a non-source node without inflow is a configuration error.
    //
    // Given
    // -----
    // - Chain 0 -> 1 plus an isolated node 2, source {0}.
    //
    // Expect
    // ------
    // - `OrphanNode { node: 2 }`.
    fn new_rejects_orphan_node() {
        let err = FlowNetwork::new(
            vec![0],
            vec![1],
            array![1.0],
            array![1.0, 1.0, 1.0],
            vec![0],
        )
        .unwrap_err();
        assert_eq!(err, NetworkError::OrphanNode { node: 2 });
    }

    #[test]
    // Purpose
    // -------
    // Verify that an empty node set and a cycle are rejected.
    //
    // Given
    // -----
    // - Empty flows; a 2-cycle 0 <-> 1.
    //
    // Expect
    // ------
    // - `EmptyNetwork` and `CyclicNetwork`.
    fn new_rejects_empty_and_cyclic_networks() {
        let err = FlowNetwork::new(vec![], vec![], Array1::zeros(0), Array1::zeros(0), vec![])
            .unwrap_err();
        assert_eq!(err, NetworkError::EmptyNetwork);

        let err = FlowNetwork::new(
            vec![0, 1],
            vec![1, 0],
            array![1.0, 1.0],
            array![1.0, 1.0],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, NetworkError::CyclicNetwork { .. }));
    }

    #[test]
    // Purpose
    // -------
    // Verify the isolated-node constructor.
    //
    // Expect
    // ------
    // - No edges, every node a source.
    fn isolated_marks_every_node_as_source() {
        let net = FlowNetwork::isolated(4).unwrap();
        assert_eq!(net.n_nodes(), 4);
        assert_eq!(net.n_edges(), 0);
        assert!((0..4).all(|n| net.is_source(n)));
    }
}
