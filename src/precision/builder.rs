//! NetworkPrecision — conditional-autoregressive precision matrix of a flow
//! network.
//!
//! Purpose
//! -------
//! Turn a validated [`FlowNetwork`] and a spatial decay rate `theta` into the
//! sparse GMRF precision
//!
//! ```text
//! Q = (I - Gamma)^T V (I - Gamma)
//! ```
//!
//! together with every intermediate quantity a caller may want to inspect
//! (`weight`, `rho`, `var`, `v_n`, `Gamma`, `V`).
//!
//! Key behaviors
//! -------------
//! - Per-edge terms via [`EdgeTerms`].
//! - Nodes are visited in topological order; each node sums
//!   `weight(e) * var(e)` over its inflow edges starting from zero, then a
//!   source node is overridden to `v_n[s] = 1`.
//! - `Gamma[to(e), from(e)] += weight(e) * rho(e)` through a
//!   [`TripletList`], so parallel edges into the same node add up.
//! - `V = diag(1 / v_n)`, failing on any `v_n <= 0`.
//! - Sparse products for `Q`; the sparsity pattern depends only on the
//!   topology, never on `theta`.
//! - Factored helpers (`(I - Gamma) x`, `(I - Gamma)^T r`, `log|Q|`) used by
//!   the factored GMRF evaluator and the analytic gradient.
//!
//! Invariants & assumptions
//! ------------------------
//! - After a successful build, every `v_n` is finite and strictly positive.
//! - For a DAG, `I - Gamma` is unit lower-triangular in topological order, so
//!   `log|Q| = -sum(ln v_n)`.
//!
//! Conventions
//! -----------
//! - Matrices are `nalgebra_sparse::CscMatrix<f64>`; vectors are `ndarray`
//!   containers.
//! - The builder performs no logging; failures are returned as
//!   [`PrecisionError`].
use crate::{
    network::FlowNetwork,
    precision::{
        edges::EdgeTerms,
        errors::{PrecisionError, PrecisionResult},
        triplets::{TripletList, csc_diagonal},
    },
};
use nalgebra::DMatrix;
use nalgebra_sparse::csc::CscMatrix;
use ndarray::{Array1, ArrayView1};

/// NetworkPrecision — sparse GMRF precision built from a flow network.
///
/// Fields
/// ------
/// - `theta`: decay rate the matrices were built at.
/// - `terms`: per-edge weights, correlations, variances and derivatives.
/// - `v_n`: conditional variance per node (sources fixed to 1).
/// - `dv_dtheta`: `d v_n / d theta` per node (zero for sources).
/// - `gamma`, `v`, `q`: path matrix, diagonal inverse variances, precision.
///
/// Invariants
/// ----------
/// - `v_n[n] > 0` and finite for all `n`, with a finite reciprocal.
/// - `q` is symmetric positive definite on a valid DAG.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkPrecision {
    theta: f64,
    from_e: Vec<usize>,
    to_e: Vec<usize>,
    terms: EdgeTerms,
    v_n: Array1<f64>,
    dv_dtheta: Array1<f64>,
    gamma: CscMatrix<f64>,
    v: CscMatrix<f64>,
    q: CscMatrix<f64>,
}

impl NetworkPrecision {
    /// Build the precision matrix of `network` at decay rate `theta`.
    ///
    /// Parameters
    /// ----------
    /// - `network`: `&FlowNetwork`
    ///   Validated topology.
    /// - `theta`: `f64`
    ///   Spatial decorrelation rate; must be finite and `> 0`.
    ///
    /// Returns
    /// -------
    /// `PrecisionResult<NetworkPrecision>`
    ///
    /// Errors
    /// ------
    /// - `PrecisionError::InvalidDecayRate` for non-finite or non-positive
    ///   `theta`.
    /// - `PrecisionError::NonPositiveVariance` when some `v_n <= 0` (e.g.
    ///   innovation variances underflow for extremely small `theta`).
    /// - `PrecisionError::SparseFormat` on internal assembly failures.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::array;
    /// # use rust_streamnet::network::FlowNetwork;
    /// # use rust_streamnet::precision::NetworkPrecision;
    /// let net = FlowNetwork::new(vec![0, 1], vec![1, 2], array![1.0, 1.0],
    ///     array![1.0, 1.0, 1.0], vec![0]).unwrap();
    /// let prec = NetworkPrecision::build(&net, 1.0).unwrap();
    /// assert_eq!(prec.v_n()[0], 1.0);
    /// assert_eq!(prec.gamma().nnz(), 2);
    /// ```
    pub fn build(network: &FlowNetwork, theta: f64) -> PrecisionResult<Self> {
        if !theta.is_finite() || theta <= 0.0 {
            return Err(PrecisionError::InvalidDecayRate { value: theta });
        }
        let n_nodes = network.n_nodes();
        let n_edges = network.n_edges();
        let terms = EdgeTerms::compute(network, theta);

        let mut v_n = Array1::<f64>::zeros(n_nodes);
        let mut dv_dtheta = Array1::<f64>::zeros(n_nodes);
        let mut gamma_triplets = TripletList::with_capacity(n_nodes, n_nodes, n_edges);
        for &node in network.order() {
            for &e in network.inflow(node) {
                gamma_triplets.push(node, network.from_e()[e], terms.path_coefficient(e));
                v_n[node] += terms.weight[e] * terms.var[e];
                dv_dtheta[node] += terms.weight[e] * terms.dvar_dtheta[e];
            }
            if network.is_source(node) {
                v_n[node] = 1.0;
                dv_dtheta[node] = 0.0;
            }
        }

        for (node, &value) in v_n.iter().enumerate() {
            if !value.is_finite() || value <= 0.0 || !value.recip().is_finite() {
                return Err(PrecisionError::NonPositiveVariance { node, value });
            }
        }

        let inv_v: Vec<f64> = v_n.iter().map(|&v| v.recip()).collect();
        let v = csc_diagonal(&inv_v)?;
        let gamma = gamma_triplets.into_csc()?;

        let identity = CscMatrix::<f64>::identity(n_nodes);
        let i_minus_gamma = &identity - &gamma;
        let weighted = &i_minus_gamma.transpose() * &v;
        let q = &weighted * &i_minus_gamma;

        Ok(NetworkPrecision {
            theta,
            from_e: network.from_e().to_vec(),
            to_e: network.to_e().to_vec(),
            terms,
            v_n,
            dv_dtheta,
            gamma,
            v,
            q,
        })
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn n_nodes(&self) -> usize {
        self.v_n.len()
    }

    pub fn n_edges(&self) -> usize {
        self.from_e.len()
    }

    pub fn terms(&self) -> &EdgeTerms {
        &self.terms
    }

    pub fn weight(&self) -> &Array1<f64> {
        &self.terms.weight
    }

    pub fn rho(&self) -> &Array1<f64> {
        &self.terms.rho
    }

    pub fn var(&self) -> &Array1<f64> {
        &self.terms.var
    }

    pub fn v_n(&self) -> &Array1<f64> {
        &self.v_n
    }

    pub fn dv_dtheta(&self) -> &Array1<f64> {
        &self.dv_dtheta
    }

    pub fn gamma(&self) -> &CscMatrix<f64> {
        &self.gamma
    }

    pub fn v(&self) -> &CscMatrix<f64> {
        &self.v
    }

    pub fn q(&self) -> &CscMatrix<f64> {
        &self.q
    }

    pub fn from_e(&self) -> &[usize] {
        &self.from_e
    }

    pub fn to_e(&self) -> &[usize] {
        &self.to_e
    }

    /// Sparse identity of matching dimension.
    pub fn identity(&self) -> CscMatrix<f64> {
        CscMatrix::identity(self.n_nodes())
    }

    /// Dense copy of `Q`; intended for diagnostics on small networks.
    pub fn q_dense(&self) -> DMatrix<f64> {
        DMatrix::from(&self.q)
    }

    /// `log|Q| = -sum(ln v_n)` (unit-triangular `I - Gamma` on a DAG).
    pub fn log_det(&self) -> f64 {
        -self.v_n.iter().map(|v| v.ln()).sum::<f64>()
    }

    /// Conditional residual `r = (I - Gamma) x`.
    ///
    /// `r[n] = x[n] - sum_{e into n} weight(e) * rho(e) * x[from(e)]`.
    pub fn residual(&self, x: ArrayView1<'_, f64>) -> Array1<f64> {
        let mut r = x.to_owned();
        for e in 0..self.n_edges() {
            r[self.to_e[e]] -= self.terms.path_coefficient(e) * x[self.from_e[e]];
        }
        r
    }

    /// Transposed residual map `(I - Gamma)^T u`.
    pub fn residual_transpose(&self, u: ArrayView1<'_, f64>) -> Array1<f64> {
        let mut out = u.to_owned();
        for e in 0..self.n_edges() {
            out[self.from_e[e]] -= self.terms.path_coefficient(e) * u[self.to_e[e]];
        }
        out
    }
}
