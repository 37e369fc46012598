//! spacetime — joint likelihood of the spatio-temporal stream-network model.
//!
//! Purpose
//! -------
//! Combine a spatial GMRF field `psi`, a space-time field `omega` evolving as
//! a random walk in time, and Gaussian observations `y[n,t]` with mean
//! `alpha + psi[n] + omega[n,t]` into one negative log-likelihood.
//!
//! Key behaviors
//! -------------
//! - [`data`]: observation matrix with NaN-coded missing cells.
//! - [`params`]: fixed parameters on the log scale and their model-scale view.
//! - [`effects`]: random effects `psi` and `omega`.
//! - [`likelihood`]: the three NLL components and the fitted mean.
//! - [`gradient`]: the exact gradient of the joint NLL.
//!
//! Conventions
//! -----------
//! - `omega` columns are time steps; flattened vectors store `omega`
//!   column-major (blocks of `N` per time step).

pub mod data;
pub mod effects;
pub mod errors;
pub mod gradient;
pub mod likelihood;
pub mod params;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::data::{MISSING, SpaceTimeData};
pub use self::effects::RandomEffects;
pub use self::errors::{SpaceTimeError, SpaceTimeResult};
pub use self::gradient::{JointGradient, joint_gradient};
pub use self::likelihood::{JointNll, fitted_mean, joint_nll};
pub use self::params::{ModelScale, N_FIXED, RHO_W, SpaceTimeParams};
