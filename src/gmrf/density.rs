//! GmrfDensity — negative log-density of a zero-mean scaled GMRF.
//!
//! Purpose
//! -------
//! Define the common contract of the GMRF evaluators and the closed form they
//! share. For `x = s * u` with `u ~ N(0, Q^{-1})` the density has precision
//! `Q / s^2`, giving
//!
//! ```text
//! nll(x; s) = 0.5 * x'Qx / s^2 - 0.5 * log|Q| + N * ln(s) + 0.5 * N * ln(2*pi)
//! ```
//!
//! Conventions
//! -----------
//! - Implementors supply `dim`, `log_det`, and `quad_form`; the scaled NLL is
//!   a provided method so every backend combines the pieces identically.
//! - The space-time assembler passes `s = 1 / beta`.
use crate::gmrf::errors::{GmrfError, GmrfResult};
use ndarray::ArrayView1;
use statrs::consts::LN_SQRT_2PI;

/// `ln(2 pi)`.
pub const LN_2PI: f64 = 2.0 * LN_SQRT_2PI;

pub trait GmrfDensity {
    /// Number of nodes `N`.
    fn dim(&self) -> usize;

    /// `log|Q|`.
    fn log_det(&self) -> f64;

    /// `x'Qx`; fails with `DimensionMismatch` when `x.len() != dim()`.
    fn quad_form(&self, x: ArrayView1<'_, f64>) -> GmrfResult<f64>;

    /// Negative log-density of `x` under the GMRF scaled by `scale`.
    ///
    /// Errors
    /// ------
    /// - `GmrfError::InvalidScale` when `scale` is not finite and `> 0`.
    /// - `GmrfError::DimensionMismatch` from [`GmrfDensity::quad_form`].
    fn neg_log_density(&self, x: ArrayView1<'_, f64>, scale: f64) -> GmrfResult<f64> {
        validate_scale(scale)?;
        let quad = self.quad_form(x)?;
        Ok(scaled_nll(quad, self.log_det(), self.dim(), scale))
    }
}

/// Combine a quadratic form and log-determinant into the scaled GMRF NLL.
pub fn scaled_nll(quad: f64, log_det: f64, n: usize, scale: f64) -> f64 {
    let n = n as f64;
    0.5 * quad / (scale * scale) - 0.5 * log_det + n * scale.ln() + 0.5 * n * LN_2PI
}

pub fn validate_scale(scale: f64) -> GmrfResult<()> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(GmrfError::InvalidScale { value: scale });
    }
    Ok(())
}

pub fn validate_dim(expected: usize, actual: usize) -> GmrfResult<()> {
    if expected != actual {
        return Err(GmrfError::DimensionMismatch { expected, actual });
    }
    Ok(())
}
