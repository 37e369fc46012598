//! Per-edge terms — flow weights, distance-decay correlations, and innovation
//! variances.
//!
//! Purpose
//! -------
//! Compute the three per-edge quantities that parameterize the network's
//! conditional-autoregressive structure, together with their derivatives with
//! respect to the spatial decay rate `theta`:
//!
//! - `weight(e) = flow(from(e)) / flow(to(e))`
//! - `rho(e)    = exp(-theta * dist(e))`
//! - `var(e)    = 1 - exp(-2 * theta * dist(e))`
//!
//! Conventions
//! -----------
//! - `var(e)` is evaluated as `-expm1(-2 * theta * dist(e))`, which keeps full
//!   relative precision when `theta * dist(e)` is tiny.
//! - Every edge is independent of every other edge; the loop order carries no
//!   meaning.
use crate::network::FlowNetwork;
use ndarray::Array1;

/// Upstream contribution weight `flow_from / flow_to`.
#[inline]
pub fn flow_weight(flow_from: f64, flow_to: f64) -> f64 {
    flow_from / flow_to
}

/// Distance-decay correlation `exp(-theta * dist)`.
#[inline]
pub fn decay_correlation(theta: f64, dist: f64) -> f64 {
    (-theta * dist).exp()
}

/// Innovation variance `1 - exp(-2 * theta * dist)`.
#[inline]
pub fn innovation_variance(theta: f64, dist: f64) -> f64 {
    -(-2.0 * theta * dist).exp_m1()
}

/// EdgeTerms — per-edge weights, correlations, variances, and their
/// `theta`-derivatives.
///
/// Fields
/// ------
/// - `weight`: `Array1<f64>`
///   Flow ratio of each edge; independent of `theta`.
/// - `rho`: `Array1<f64>`
///   Distance-decay correlation of each edge.
/// - `var`: `Array1<f64>`
///   Innovation variance contribution of each edge.
/// - `drho_dtheta`: `Array1<f64>`
///   `-dist * rho`.
/// - `dvar_dtheta`: `Array1<f64>`
///   `2 * dist * exp(-2 * theta * dist)`.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeTerms {
    pub weight: Array1<f64>,
    pub rho: Array1<f64>,
    pub var: Array1<f64>,
    pub drho_dtheta: Array1<f64>,
    pub dvar_dtheta: Array1<f64>,
}

impl EdgeTerms {
    /// Evaluate all per-edge terms of `network` at decay rate `theta`.
    ///
    /// The caller is responsible for `theta` being finite and positive; the
    /// precision builder checks this before calling.
    pub fn compute(network: &FlowNetwork, theta: f64) -> EdgeTerms {
        let n_edges = network.n_edges();
        let flow = network.flow_n();
        let mut weight = Array1::zeros(n_edges);
        let mut rho = Array1::zeros(n_edges);
        let mut var = Array1::zeros(n_edges);
        let mut drho_dtheta = Array1::zeros(n_edges);
        let mut dvar_dtheta = Array1::zeros(n_edges);

        for e in 0..n_edges {
            let from = network.from_e()[e];
            let to = network.to_e()[e];
            let dist = network.dist_e()[e];
            weight[e] = flow_weight(flow[from], flow[to]);
            rho[e] = decay_correlation(theta, dist);
            var[e] = innovation_variance(theta, dist);
            drho_dtheta[e] = -dist * rho[e];
            dvar_dtheta[e] = 2.0 * dist * (-2.0 * theta * dist).exp();
        }

        EdgeTerms { weight, rho, var, drho_dtheta, dvar_dtheta }
    }

    pub fn len(&self) -> usize {
        self.weight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weight.is_empty()
    }

    /// Path coefficient `weight * rho` of edge `e`.
    #[inline]
    pub fn path_coefficient(&self, e: usize) -> f64 {
        self.weight[e] * self.rho[e]
    }
}
