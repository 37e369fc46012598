//! gmrf — zero-mean Gaussian Markov random field densities.
//!
//! Purpose
//! -------
//! Evaluate the negative log-density of a vector under a scaled GMRF with
//! precision `Q`. Two evaluators share the [`GmrfDensity`] contract:
//!
//! - [`FactoredGmrf`] works from the network factorisation of `Q` and also
//!   provides exact derivatives;
//! - [`CholeskyGmrf`] factors the assembled sparse `Q`, optionally reusing a
//!   [`CholeskyCache`] across evaluations.
//!
//! Conventions
//! -----------
//! - `scale = s` means `x = s * u` with `u ~ GMRF(Q)`; the space-time model
//!   uses `s = 1 / beta`.

pub mod cholesky;
pub mod density;
pub mod errors;
pub mod factored;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::cholesky::{CholeskyCache, CholeskyGmrf};
pub use self::density::GmrfDensity;
pub use self::errors::{GmrfError, GmrfResult};
pub use self::factored::{FactoredGmrf, GmrfGradient};
