//! Fixed parameters of the space-time model.
//!
//! Purpose
//! -------
//! Represent the five fixed parameters on the optimizer (unconstrained) scale
//! and map them to the model scale by exponentiation.
//!
//! Key behaviors
//! -------------
//! - [`SpaceTimeParams`] stores `log_theta, log_sigma_y, alpha, log_beta1,
//!   log_beta2` in that order; [`SpaceTimeParams::to_array`] and
//!   [`SpaceTimeParams::from_slice`] use the same order.
//! - [`SpaceTimeParams::model_scale`] exponentiates and attaches the fixed
//!   temporal autocorrelation [`RHO_W`].
//! - [`ModelScale::infeasibility`] reports parameters whose exponentiated
//!   values overflow or underflow.
//!
//! Invariants & assumptions
//! ------------------------
//! - NaN parameters are rejected by [`SpaceTimeParams::validate`]; `±inf` on
//!   the log scale is allowed and surfaces as infeasibility.
use crate::spacetime::errors::{SpaceTimeError, SpaceTimeResult};
use ndarray::Array1;

/// Number of fixed parameters.
pub const N_FIXED: usize = 5;

/// Temporal autocorrelation of `omega` (random walk in time).
pub const RHO_W: f64 = 1.0;

/// Fixed-parameter names in layout order.
pub const FIXED_NAMES: [&str; N_FIXED] =
    ["log_theta", "log_sigma_y", "alpha", "log_beta1", "log_beta2"];

/// `SpaceTimeParams` — fixed parameters on the optimizer scale.
///
/// Fields
/// ------
/// - `log_theta`: log spatial decay rate.
/// - `log_sigma_y`: log observation noise standard deviation.
/// - `alpha`: global intercept.
/// - `log_beta1`: log spatial precision multiplier.
/// - `log_beta2`: log space-time precision multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpaceTimeParams {
    pub log_theta: f64,
    pub log_sigma_y: f64,
    pub alpha: f64,
    pub log_beta1: f64,
    pub log_beta2: f64,
}

impl SpaceTimeParams {
    pub fn new(log_theta: f64, log_sigma_y: f64, alpha: f64, log_beta1: f64, log_beta2: f64) -> Self {
        SpaceTimeParams { log_theta, log_sigma_y, alpha, log_beta1, log_beta2 }
    }

    /// Read the five fixed parameters from `values` (layout order).
    ///
    /// Errors
    /// ------
    /// - `SpaceTimeError::ParameterLengthMismatch` unless `values.len() == 5`.
    /// - `SpaceTimeError::InvalidParameter` for a NaN entry.
    pub fn from_slice(values: &[f64]) -> SpaceTimeResult<Self> {
        if values.len() != N_FIXED {
            return Err(SpaceTimeError::ParameterLengthMismatch {
                expected: N_FIXED,
                actual: values.len(),
            });
        }
        let params = SpaceTimeParams::new(values[0], values[1], values[2], values[3], values[4]);
        params.validate()?;
        Ok(params)
    }

    /// Values in layout order.
    pub fn values(&self) -> [f64; N_FIXED] {
        [self.log_theta, self.log_sigma_y, self.alpha, self.log_beta1, self.log_beta2]
    }

    pub fn to_array(&self) -> Array1<f64> {
        Array1::from(self.values().to_vec())
    }

    /// Reject NaN entries.
    pub fn validate(&self) -> SpaceTimeResult<()> {
        for (name, value) in FIXED_NAMES.into_iter().zip(self.values()) {
            if value.is_nan() {
                return Err(SpaceTimeError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }

    pub fn model_scale(&self) -> ModelScale {
        ModelScale {
            theta: self.log_theta.exp(),
            sigma_y: self.log_sigma_y.exp(),
            alpha: self.alpha,
            beta1: self.log_beta1.exp(),
            beta2: self.log_beta2.exp(),
            rho_w: RHO_W,
        }
    }
}

/// `ModelScale` — fixed parameters after exponentiation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelScale {
    pub theta: f64,
    pub sigma_y: f64,
    pub alpha: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub rho_w: f64,
}

impl ModelScale {
    /// Reason the objective cannot be finite at these values, if any.
    ///
    /// Positive quantities must be finite and `> 0` after exponentiation,
    /// with finite reciprocals; `alpha` must be finite.
    pub fn infeasibility(&self) -> Option<String> {
        let positive = [
            ("theta", self.theta),
            ("sigma_y", self.sigma_y),
            ("beta1", self.beta1),
            ("beta2", self.beta2),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Some(format!("{name} = {value} is not a finite positive number"));
            }
        }
        if !self.alpha.is_finite() {
            return Some(format!("alpha = {} is not finite", self.alpha));
        }
        // Subnormal values pass the check above but have infinite reciprocals.
        let reciprocals = [
            ("1 / sigma_y", self.sigma_y.recip()),
            ("1 / beta1", self.spatial_scale()),
            ("1 / beta2", self.temporal_scale()),
        ];
        for (name, value) in reciprocals {
            if !value.is_finite() {
                return Some(format!("{name} = {value} is not finite"));
            }
        }
        None
    }

    /// GMRF scale multiplier of the spatial term, `1 / beta1`.
    pub fn spatial_scale(&self) -> f64 {
        self.beta1.recip()
    }

    /// GMRF scale multiplier of the space-time term, `1 / beta2`.
    pub fn temporal_scale(&self) -> f64 {
        self.beta2.recip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Layout order of `from_slice` / `to_array`.
    // - NaN rejection and infeasibility detection after exponentiation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify layout order and the model-scale mapping.
    //
    // Given
    // -----
    // - [ln 2, ln 0.5, 3, 0, ln 4].
    //
    // Expect
    // ------
    // - theta = 2, sigma_y = 0.5, alpha = 3, beta1 = 1, beta2 = 4, rho_w = 1.
    fn from_slice_maps_to_model_scale() {
        let raw = [2.0_f64.ln(), 0.5_f64.ln(), 3.0, 0.0, 4.0_f64.ln()];
        let params = SpaceTimeParams::from_slice(&raw).unwrap();
        assert_eq!(params.to_array().to_vec(), raw.to_vec());
        let scale = params.model_scale();
        assert_relative_eq!(scale.theta, 2.0, epsilon = 1e-14);
        assert_relative_eq!(scale.sigma_y, 0.5, epsilon = 1e-14);
        assert_eq!(scale.alpha, 3.0);
        assert_eq!(scale.beta1, 1.0);
        assert_relative_eq!(scale.temporal_scale(), 0.25, epsilon = 1e-14);
        assert_eq!(scale.rho_w, RHO_W);
        assert_eq!(scale.infeasibility(), None);
    }

    #[test]
    // Purpose
    // -------
    // Verify NaN rejection and length checks.
    //
    // Expect
    // ------
    // - `InvalidParameter { name: "alpha", .. }`, `ParameterLengthMismatch`.
    fn from_slice_rejects_nan_and_wrong_length() {
        let err = SpaceTimeParams::from_slice(&[0.0, 0.0, f64::NAN, 0.0, 0.0]).unwrap_err();
        assert!(matches!(err, SpaceTimeError::InvalidParameter { name: "alpha", .. }));
        let err = SpaceTimeParams::from_slice(&[0.0; 4]).unwrap_err();
        assert_eq!(err, SpaceTimeError::ParameterLengthMismatch { expected: 5, actual: 4 });
    }

    #[test]
    // Purpose
    // -------
    // Verify that overflow and underflow of exponentiated parameters are
    // reported as infeasible.
    //
    // Given
    // -----
    // - log_theta = 800 (theta = inf), then log_beta2 = -800 (beta2 = 0).
    //
    // Expect
    // ------
    // - `infeasibility()` names theta, then beta2.
    fn infeasibility_detects_exponent_overflow() {
        let p = SpaceTimeParams::new(800.0, 0.0, 0.0, 0.0, 0.0);
        assert!(p.model_scale().infeasibility().unwrap().starts_with("theta"));
        let p = SpaceTimeParams::new(0.0, 0.0, 0.0, 0.0, -800.0);
        assert!(p.model_scale().infeasibility().unwrap().starts_with("beta2"));
    }

    #[test]
    // Purpose
    // -------
    // Verify that subnormal precision multipliers are infeasible.
    //
    // Given
    // -----
    // - log_beta1 = -710, then log_beta2 = -710: beta is subnormal and
    //   `1 / beta` overflows to +inf.
    //
    // Expect
    // ------
    // - `infeasibility()` names `1 / beta1`, then `1 / beta2`.
    fn infeasibility_detects_subnormal_beta() {
        let p = SpaceTimeParams::new(0.0, 0.0, 0.0, -710.0, 0.0);
        let scale = p.model_scale();
        assert!(scale.beta1 > 0.0);
        assert!(scale.infeasibility().unwrap().starts_with("1 / beta1"));
        let p = SpaceTimeParams::new(0.0, 0.0, 0.0, 0.0, -710.0);
        assert!(p.model_scale().infeasibility().unwrap().starts_with("1 / beta2"));
    }
}
