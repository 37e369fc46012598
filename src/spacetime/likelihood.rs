//! Space-time likelihood assembler.
//!
//! Purpose
//! -------
//! Combine the spatial GMRF density, the autoregressive space-time GMRF
//! density, and the Gaussian observation likelihood into the joint negative
//! log-likelihood
//!
//! ```text
//! jnll = nll(psi; 1/beta1)
//!      + nll(omega[:,0]; 1/beta2) + sum_{t>=1} nll(omega[:,t] - rho_w*omega[:,t-1]; 1/beta2)
//!      - sum_{y[n,t] observed} ln Normal(y[n,t]; alpha + psi[n] + omega[n,t], sigma_y)
//! ```
//!
//! Key behaviors
//! -------------
//! - The three components are kept separate in [`JointNll`] for reporting.
//! - Each function is generic over [`GmrfDensity`], so the factored and
//!   Cholesky evaluators plug in unchanged.
//! - Missing cells (NaN) are skipped by the observation term.
//!
//! Invariants & assumptions
//! ------------------------
//! - Shapes were checked by the caller: `psi.len() == N`, `omega` is
//!   `N x n_t`, and `y` is `N x n_t`.
//! - `sigma_y`, `beta1`, `beta2` are finite and positive (see
//!   [`ModelScale::infeasibility`]).
//!
//! Conventions
//! -----------
//! - Temporal steps are accumulated in increasing `t`; the summation order is
//!   fixed so repeated evaluations are bit-identical.
use crate::{
    gmrf::{GmrfDensity, GmrfResult},
    spacetime::{
        data::SpaceTimeData,
        effects::RandomEffects,
        errors::{SpaceTimeError, SpaceTimeResult},
        params::ModelScale,
    },
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use statrs::distribution::{Continuous, Normal};

/// `JointNll` — the three additive components of the objective.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JointNll {
    pub spatial: f64,
    pub temporal: f64,
    pub observation: f64,
}

impl JointNll {
    pub fn total(&self) -> f64 {
        self.spatial + self.temporal + self.observation
    }
}

/// Spatial term `nll(psi; 1 / beta1)`.
pub fn spatial_nll<G: GmrfDensity>(
    gmrf: &G, psi: ArrayView1<'_, f64>, beta1: f64,
) -> GmrfResult<f64> {
    gmrf.neg_log_density(psi, beta1.recip())
}

/// Innovation of step `t`: `omega[:,0]` for `t = 0`, otherwise
/// `omega[:,t] - rho_w * omega[:,t-1]`.
pub fn temporal_innovation(omega: ArrayView2<'_, f64>, t: usize, rho_w: f64) -> Array1<f64> {
    let current = omega.column(t).to_owned();
    if t == 0 {
        current
    } else {
        current - &(&omega.column(t - 1) * rho_w)
    }
}

/// Temporal term over all `n_t` columns of `omega`; zero when `n_t == 0`.
pub fn temporal_nll<G: GmrfDensity>(
    gmrf: &G, omega: ArrayView2<'_, f64>, beta2: f64, rho_w: f64,
) -> GmrfResult<f64> {
    let scale = beta2.recip();
    let mut total = 0.0;
    for t in 0..omega.ncols() {
        let x = temporal_innovation(omega, t, rho_w);
        total += gmrf.neg_log_density(x.view(), scale)?;
    }
    Ok(total)
}

/// Fitted mean `z[n,t] = alpha + psi[n] + omega[n,t]`.
pub fn fitted_mean(
    alpha: f64, psi: ArrayView1<'_, f64>, omega: ArrayView2<'_, f64>,
) -> Array2<f64> {
    let mut z = omega.to_owned();
    for ((n, _), cell) in z.indexed_iter_mut() {
        *cell += alpha + psi[n];
    }
    z
}

/// Observation term `-sum ln Normal(y; z, sigma_y)` over non-missing cells.
///
/// Errors
/// ------
/// - `SpaceTimeError::InvalidParameter` when `sigma_y` is not a valid
///   standard deviation.
pub fn observation_nll(
    data: &SpaceTimeData, z: ArrayView2<'_, f64>, sigma_y: f64,
) -> SpaceTimeResult<f64> {
    let noise = Normal::new(0.0, sigma_y)
        .map_err(|_| SpaceTimeError::InvalidParameter { name: "sigma_y", value: sigma_y })?;
    let mut total = 0.0;
    for (n, t, y) in data.observed() {
        total -= noise.ln_pdf(y - z[[n, t]]);
    }
    Ok(total)
}

/// Evaluate all three components with one GMRF evaluator.
///
/// The spatial and space-time fields share the precision structure; only
/// their scale multipliers differ.
pub fn joint_nll<G: GmrfDensity>(
    gmrf: &G, data: &SpaceTimeData, scale: &ModelScale, effects: &RandomEffects,
) -> SpaceTimeResult<JointNll> {
    let spatial = spatial_nll(gmrf, effects.psi.view(), scale.beta1)?;
    let temporal = temporal_nll(gmrf, effects.omega.view(), scale.beta2, scale.rho_w)?;
    let z = fitted_mean(scale.alpha, effects.psi.view(), effects.omega.view());
    let observation = observation_nll(data, z.view(), scale.sigma_y)?;
    Ok(JointNll { spatial, temporal, observation })
}
