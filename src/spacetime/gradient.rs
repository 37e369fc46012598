//! Analytic gradient of the joint negative log-likelihood.
//!
//! Purpose
//! -------
//! Differentiate the objective assembled in
//! [`likelihood`](super::likelihood) with respect to every fixed parameter
//! (on the optimizer scale) and every random effect.
//!
//! Key behaviors
//! -------------
//! - GMRF terms go through [`FactoredGmrf::gradient`]; derivatives in `theta`
//!   and `ln(1/beta)` are mapped to `log_theta` and `log_beta` by the chain
//!   rule (`d/dlog_theta = theta * d/dtheta`, `d/dlog_beta = -d/dln(s)`).
//! - The temporal innovation `omega[:,t] - rho_w * omega[:,t-1]` sends its
//!   gradient to column `t` and `-rho_w` times it to column `t - 1`.
//! - Each observed cell adds `-(y - z) / sigma_y^2` to `alpha`, `psi[n]`, and
//!   `omega[n,t]`, and `1 - ((y - z) / sigma_y)^2` to `log_sigma_y`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Same preconditions as the likelihood: checked shapes and a feasible
//!   [`ModelScale`].
//! - The gradient always uses the factored form of `Q`, whichever evaluator
//!   produced the value.
use crate::{
    gmrf::FactoredGmrf,
    precision::NetworkPrecision,
    spacetime::{
        data::SpaceTimeData,
        effects::RandomEffects,
        errors::SpaceTimeResult,
        likelihood::{fitted_mean, temporal_innovation},
        params::{ModelScale, N_FIXED},
    },
};
use ndarray::{Array1, Array2, s};

/// `JointGradient` — derivatives of the joint NLL.
///
/// - `fixed`: `[log_theta, log_sigma_y, alpha, log_beta1, log_beta2]`.
/// - `psi`, `omega`: same shapes as the random effects.
#[derive(Debug, Clone, PartialEq)]
pub struct JointGradient {
    pub fixed: [f64; N_FIXED],
    pub psi: Array1<f64>,
    pub omega: Array2<f64>,
}

impl JointGradient {
    /// Flatten as `[fixed, psi, omega column-major]`.
    pub fn to_flat(&self) -> Array1<f64> {
        let n = self.psi.len();
        let n_t = self.omega.ncols();
        let mut flat = Array1::zeros(N_FIXED + n + n * n_t);
        flat.slice_mut(s![..N_FIXED]).assign(&Array1::from(self.fixed.to_vec()));
        flat.slice_mut(s![N_FIXED..N_FIXED + n]).assign(&self.psi);
        for t in 0..n_t {
            let start = N_FIXED + n + t * n;
            flat.slice_mut(s![start..start + n]).assign(&self.omega.column(t));
        }
        flat
    }

    /// Random-effect block only, `[psi, omega column-major]`.
    pub fn random_flat(&self) -> Array1<f64> {
        self.to_flat().slice(s![N_FIXED..]).to_owned()
    }
}

const LOG_THETA: usize = 0;
const LOG_SIGMA_Y: usize = 1;
const ALPHA: usize = 2;
const LOG_BETA1: usize = 3;
const LOG_BETA2: usize = 4;

/// Gradient of the joint NLL at `(scale, effects)`.
pub fn joint_gradient(
    precision: &NetworkPrecision, data: &SpaceTimeData, scale: &ModelScale, effects: &RandomEffects,
) -> SpaceTimeResult<JointGradient> {
    let gmrf = FactoredGmrf::new(precision);
    let n_t = effects.omega.ncols();
    let mut fixed = [0.0; N_FIXED];
    let mut psi = Array1::<f64>::zeros(effects.psi.len());
    let mut omega = Array2::<f64>::zeros(effects.omega.dim());

    // Spatial field.
    let g = gmrf.gradient(effects.psi.view(), scale.spatial_scale())?;
    fixed[LOG_THETA] += scale.theta * g.dtheta;
    fixed[LOG_BETA1] -= g.dlog_scale;
    psi += &g.dx;

    // Space-time field.
    let temporal_scale = scale.temporal_scale();
    for t in 0..n_t {
        let x = temporal_innovation(effects.omega.view(), t, scale.rho_w);
        let g = gmrf.gradient(x.view(), temporal_scale)?;
        fixed[LOG_THETA] += scale.theta * g.dtheta;
        fixed[LOG_BETA2] -= g.dlog_scale;
        let mut col = omega.column_mut(t);
        col += &g.dx;
        if t > 0 {
            let mut prev = omega.column_mut(t - 1);
            prev.scaled_add(-scale.rho_w, &g.dx);
        }
    }

    // Observations.
    let z = fitted_mean(scale.alpha, effects.psi.view(), effects.omega.view());
    let var_y = scale.sigma_y * scale.sigma_y;
    for (n, t, y) in data.observed() {
        let resid = y - z[[n, t]];
        let dz = -resid / var_y;
        fixed[ALPHA] += dz;
        psi[n] += dz;
        omega[[n, t]] += dz;
        let std_resid = resid / scale.sigma_y;
        fixed[LOG_SIGMA_Y] += 1.0 - std_resid * std_resid;
    }

    Ok(JointGradient { fixed, psi, omega })
}
