//! Network validation helpers — index bounds, edge attributes, and structure.
//!
//! Purpose
//! -------
//! Centralize the checks that turn raw topology arrays (`from_e`, `to_e`,
//! `dist_e`, `flow_n`, `source_s`) into a network the precision builder can
//! trust. Each helper fails fast with a structured [`NetworkError`] pointing at
//! the first offending edge or node.
//!
//! Key behaviors
//! -------------
//! - Validate per-edge array lengths and endpoint indices.
//! - Validate edge distances (finite, >= 0) and node flows (finite, > 0).
//! - Validate declared sources against the node count.
//! - Compute a topological order (Kahn's algorithm), rejecting self loops and
//!   directed cycles.
//! - Reject non-source nodes whose conditional variance would be identically
//!   zero (no inflow, or only zero-distance inflow).
//!
//! Conventions
//! -----------
//! - Indices are 0-based.
//! - Helpers never panic on invalid inputs and perform no I/O or logging.
use crate::network::errors::{NetworkError, NetworkResult};
use ndarray::Array1;
use std::collections::VecDeque;

/// Check that all per-edge arrays have the same length as `from_e`.
pub fn validate_edge_lengths(
    from_e: &[usize], to_e: &[usize], dist_e: &Array1<f64>,
) -> NetworkResult<()> {
    let expected = from_e.len();
    if to_e.len() != expected {
        return Err(NetworkError::EdgeLengthMismatch {
            field: "to_e",
            expected,
            actual: to_e.len(),
        });
    }
    if dist_e.len() != expected {
        return Err(NetworkError::EdgeLengthMismatch {
            field: "dist_e",
            expected,
            actual: dist_e.len(),
        });
    }
    Ok(())
}

/// Check that every edge endpoint is a valid node index and not a self loop.
///
/// # Errors
/// - [`NetworkError::EdgeNodeOutOfRange`] for the first endpoint `>= n_nodes`.
/// - [`NetworkError::SelfLoop`] for the first edge with `from == to`.
pub fn validate_endpoints(from_e: &[usize], to_e: &[usize], n_nodes: usize) -> NetworkResult<()> {
    for (edge, (&from, &to)) in from_e.iter().zip(to_e.iter()).enumerate() {
        for node in [from, to] {
            if node >= n_nodes {
                return Err(NetworkError::EdgeNodeOutOfRange { edge, node, n_nodes });
            }
        }
        if from == to {
            return Err(NetworkError::SelfLoop { edge, node: from });
        }
    }
    Ok(())
}

/// Check that every edge distance is finite and non-negative.
pub fn validate_distances(dist_e: &Array1<f64>) -> NetworkResult<()> {
    for (edge, &value) in dist_e.iter().enumerate() {
        if !value.is_finite() || value < 0.0 {
            return Err(NetworkError::InvalidDistance { edge, value });
        }
    }
    Ok(())
}

/// Check that every node flow is finite and strictly positive.
pub fn validate_flows(flow_n: &Array1<f64>) -> NetworkResult<()> {
    for (node, &value) in flow_n.iter().enumerate() {
        if !value.is_finite() || value <= 0.0 {
            return Err(NetworkError::InvalidFlow { node, value });
        }
    }
    Ok(())
}

/// Check declared sources and return a per-node membership mask.
///
/// Duplicated source entries are accepted; the override is idempotent.
pub fn validate_sources(source_s: &[usize], n_nodes: usize) -> NetworkResult<Vec<bool>> {
    let mut is_source = vec![false; n_nodes];
    for (index, &node) in source_s.iter().enumerate() {
        if node >= n_nodes {
            return Err(NetworkError::SourceOutOfRange { index, node, n_nodes });
        }
        is_source[node] = true;
    }
    Ok(is_source)
}

/// Check that every non-source node can carry a positive conditional variance.
///
/// # Errors
/// - [`NetworkError::OrphanNode`] when a non-source node has no inflow.
/// - [`NetworkError::DegenerateInflow`] when all of its inflows have zero
///   distance.
pub fn validate_inflow(
    to_e: &[usize], dist_e: &Array1<f64>, is_source: &[bool],
) -> NetworkResult<()> {
    let n_nodes = is_source.len();
    let mut inflow = vec![0_usize; n_nodes];
    let mut informative = vec![false; n_nodes];
    for (&to, &dist) in to_e.iter().zip(dist_e.iter()) {
        inflow[to] += 1;
        if dist > 0.0 {
            informative[to] = true;
        }
    }
    for node in 0..n_nodes {
        if is_source[node] {
            continue;
        }
        if inflow[node] == 0 {
            return Err(NetworkError::OrphanNode { node });
        }
        if !informative[node] {
            return Err(NetworkError::DegenerateInflow { node });
        }
    }
    Ok(())
}

/// Topological order of the nodes (upstream before downstream).
///
/// Uses Kahn's algorithm; ties are broken by node index so the order is
/// deterministic.
///
/// # Errors
/// - [`NetworkError::CyclicNetwork`] naming the smallest node left on a cycle.
pub fn topological_order(
    from_e: &[usize], to_e: &[usize], n_nodes: usize,
) -> NetworkResult<Vec<usize>> {
    let mut indegree = vec![0_usize; n_nodes];
    let mut downstream: Vec<Vec<usize>> = vec![Vec::new(); n_nodes];
    for (&from, &to) in from_e.iter().zip(to_e.iter()) {
        indegree[to] += 1;
        downstream[from].push(to);
    }

    let mut queue: VecDeque<usize> = (0..n_nodes).filter(|&n| indegree[n] == 0).collect();
    let mut order = Vec::with_capacity(n_nodes);
    while let Some(node) = queue.pop_front() {
        order.push(node);
        for &next in &downstream[node] {
            indegree[next] -= 1;
            if indegree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    if order.len() < n_nodes {
        let node = (0..n_nodes).find(|&n| indegree[n] > 0).unwrap_or(0);
        return Err(NetworkError::CyclicNetwork { node });
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Edge length, endpoint, distance, flow, and source checks.
    // - Inflow checks for orphan and degenerate nodes.
    // - Topological ordering and cycle detection.
    //
    // They intentionally DO NOT cover:
    // - `FlowNetwork::new`, which chains these helpers (tested in `topology`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that per-edge arrays of different lengths are rejected.
    //
    // Given
    // -----
    // - Two endpoints per side but three distances.
    //
    // Expect
    // ------
    // - `EdgeLengthMismatch` naming `dist_e`.
    fn validate_edge_lengths_rejects_mismatched_distances() {
        let err = validate_edge_lengths(&[0, 1], &[1, 2], &array![1.0, 1.0, 1.0]).unwrap_err();
        assert_eq!(
            err,
            NetworkError::EdgeLengthMismatch { field: "dist_e", expected: 2, actual: 3 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify endpoint bounds and self-loop detection.
    //
    // Given
    // -----
    // - A 3-node network with an edge into node 3, and one with a self loop.
    //
    // Expect
    // ------
    // - `EdgeNodeOutOfRange` and `SelfLoop` respectively.
    fn validate_endpoints_rejects_out_of_range_and_self_loops() {
        assert_eq!(
            validate_endpoints(&[0, 1], &[1, 3], 3).unwrap_err(),
            NetworkError::EdgeNodeOutOfRange { edge: 1, node: 3, n_nodes: 3 }
        );
        assert_eq!(
            validate_endpoints(&[0, 2], &[1, 2], 3).unwrap_err(),
            NetworkError::SelfLoop { edge: 1, node: 2 }
        );
        assert!(validate_endpoints(&[0, 1], &[1, 2], 3).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Verify distance and flow attribute checks.
    //
    // Given
    // -----
    // - A negative distance, a NaN distance, a zero flow.
    //
    // Expect
    // ------
    // - The first offending index is reported; zero distance is accepted.
    fn validate_attributes_reports_first_invalid_entry() {
        assert_eq!(
            validate_distances(&array![0.0, -1.0]).unwrap_err(),
            NetworkError::InvalidDistance { edge: 1, value: -1.0 }
        );
        assert!(matches!(
            validate_distances(&array![f64::NAN]).unwrap_err(),
            NetworkError::InvalidDistance { edge: 0, .. }
        ));
        assert_eq!(
            validate_flows(&array![1.0, 0.0, 2.0]).unwrap_err(),
            NetworkError::InvalidFlow { node: 1, value: 0.0 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify source validation and mask construction.
    //
    // Given
    // -----
    // - Sources `[0, 0, 2]` in a 3-node network, and `[5]`.
    //
    // Expect
    // ------
    // - Mask `[true, false, true]`; out-of-range source rejected.
    fn validate_sources_builds_mask_and_checks_bounds() {
        assert_eq!(validate_sources(&[0, 0, 2], 3).unwrap(), vec![true, false, true]);
        assert_eq!(
            validate_sources(&[5], 3).unwrap_err(),
            NetworkError::SourceOutOfRange { index: 0, node: 5, n_nodes: 3 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify that non-source nodes need an informative inflow.
    //
    // Given
    // -----
    // - Chain 0 -> 1 with source {0} and a third isolated node.
    // - Chain 0 -> 1 with zero distance.
    //
    // Expect
    // ------
    // - `OrphanNode { node: 2 }` and `DegenerateInflow { node: 1 }`.
    fn validate_inflow_rejects_orphans_and_zero_distance_inflow() {
        let mask = vec![true, false, false];
        assert_eq!(
            validate_inflow(&[1], &array![1.0], &mask).unwrap_err(),
            NetworkError::OrphanNode { node: 2 }
        );
        let mask = vec![true, false];
        assert_eq!(
            validate_inflow(&[1], &array![0.0], &mask).unwrap_err(),
            NetworkError::DegenerateInflow { node: 1 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify topological ordering on a confluence and cycle detection.
    //
    // Given
    // -----
    // - Edges 0 -> 2, 1 -> 2, 2 -> 3.
    // - Edges 0 -> 1, 1 -> 2, 2 -> 1.
    //
    // Expect
    // ------
    // - Order `[0, 1, 2, 3]`.
    // - `CyclicNetwork` naming node 1.
    fn topological_order_orders_confluence_and_detects_cycles() {
        assert_eq!(topological_order(&[0, 1, 2], &[2, 2, 3], 4).unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(
            topological_order(&[0, 1, 2], &[1, 2, 1], 3).unwrap_err(),
            NetworkError::CyclicNetwork { node: 1 }
        );
    }
}
