//! objective — evaluation, reporting, and parameter layout for hosts.
//!
//! Purpose
//! -------
//! Present the space-time likelihood as an objective that an external
//! optimizer or Laplace-approximation host can drive:
//!
//! - [`SpaceTimeModel`] evaluates the joint NLL, its exact gradient, and a
//!   [`Report`] of intermediate matrices and vectors.
//! - [`ParameterLayout`] maps the flat parameter vector to structured inputs.
//! - [`EvalOptions`] selects the GMRF evaluator and effect validation.
//!
//! Conventions
//! -----------
//! - Configuration errors are `Err`; numerical infeasibility is an
//!   [`Evaluation`] with value `+inf`.

pub mod layout;
pub mod model;
pub mod options;
pub mod report;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::layout::ParameterLayout;
pub use self::model::{EvalStatus, Evaluation, ObjectiveGradient, SpaceTimeModel};
pub use self::options::{EvalOptions, GmrfBackend};
pub use self::report::{FittedMean, Report};
