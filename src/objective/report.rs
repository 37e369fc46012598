//! Reported quantities of one objective evaluation.
//!
//! Purpose
//! -------
//! Expose the intermediate structures behind an evaluation for inspection:
//! the sparse matrices `Gamma`, `V`, `I`, `Q`, the per-edge `weight`, `rho`,
//! `var`, the conditional variances `v_n`, the NLL components, and the fitted
//! mean `z`.
//!
//! Key behaviors
//! -------------
//! - [`Report::q_dense`] gives a dense copy of `Q` for diagnostics.
//! - [`FittedMean`] pairs `z` with the positions of its unit partial
//!   derivatives in the flat parameter vector, so a host can propagate its
//!   own parameter covariance to `z`.
use crate::{
    objective::layout::ParameterLayout,
    precision::NetworkPrecision,
    spacetime::{
        errors::{SpaceTimeError, SpaceTimeResult},
        likelihood::JointNll,
    },
};
use nalgebra::DMatrix;
use nalgebra_sparse::csc::CscMatrix;
use ndarray::{Array1, Array2};

/// `Report` — matrices, vectors, and NLL components at one parameter point.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub gamma: CscMatrix<f64>,
    pub v: CscMatrix<f64>,
    pub identity: CscMatrix<f64>,
    pub q: CscMatrix<f64>,
    pub weight: Array1<f64>,
    pub rho: Array1<f64>,
    pub var: Array1<f64>,
    pub v_n: Array1<f64>,
    pub jnll: JointNll,
    pub z: Array2<f64>,
}

impl Report {
    pub(crate) fn new(precision: &NetworkPrecision, jnll: JointNll, z: Array2<f64>) -> Self {
        Report {
            gamma: precision.gamma().clone(),
            v: precision.v().clone(),
            identity: precision.identity(),
            q: precision.q().clone(),
            weight: precision.weight().clone(),
            rho: precision.rho().clone(),
            var: precision.var().clone(),
            v_n: precision.v_n().clone(),
            jnll,
            z,
        }
    }

    /// Dense copy of `Q`.
    pub fn q_dense(&self) -> DMatrix<f64> {
        DMatrix::from(&self.q)
    }
}

/// `FittedMean` — `z[n,t] = alpha + psi[n] + omega[n,t]` with derivative
/// positions.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedMean {
    pub z: Array2<f64>,
    layout: ParameterLayout,
}

impl FittedMean {
    pub(crate) fn new(z: Array2<f64>, layout: ParameterLayout) -> Self {
        FittedMean { z, layout }
    }

    /// Flat indices of `alpha`, `psi[n]`, and `omega[n,t]`.
    ///
    /// Each has partial derivative 1 on `z[n,t]`; all other parameters have
    /// partial derivative 0.
    ///
    /// Errors
    /// ------
    /// - `SpaceTimeError::CellOutOfRange` unless `node < n_nodes` and
    ///   `time < n_t`.
    pub fn jacobian_indices(&self, node: usize, time: usize) -> SpaceTimeResult<[usize; 3]> {
        let (n_nodes, n_t) = (self.layout.n_nodes(), self.layout.n_t());
        if node >= n_nodes || time >= n_t {
            return Err(SpaceTimeError::CellOutOfRange { node, time, n_nodes, n_t });
        }
        Ok([
            self.layout.alpha_index(),
            self.layout.psi_index(node),
            self.layout.omega_index(node, time),
        ])
    }

    /// Dense Jacobian row of `z[n,t]` over the flat parameter vector.
    pub fn jacobian_row(&self, node: usize, time: usize) -> SpaceTimeResult<Array1<f64>> {
        let mut row = Array1::<f64>::zeros(self.layout.len());
        for index in self.jacobian_indices(node, time)? {
            row[index] = 1.0;
        }
        Ok(row)
    }
}
