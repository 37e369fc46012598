//! optimization — argmin adapters and the optimizer error surface.
//!
//! Purpose
//! -------
//! Let argmin solvers drive [`SpaceTimeModel`](crate::objective::SpaceTimeModel)
//! without the model knowing about them. The joint NLL is minimized as is;
//! no sign flip happens in this layer.
//!
//! Key behaviors
//! -------------
//! - `problem` implements `CostFunction` and `Gradient` for the full flat
//!   parameter vector and for the random-effect block with fixed parameters
//!   held constant. Solvers are chosen and configured by the caller.
//! - `errors` normalizes argmin failures, invalid gradients, and model
//!   errors into [`OptError`](errors::OptError).
//!
//! Conventions
//! -----------
//! - Fallible entrypoints return `OptResult<T>`; callers never see raw argmin
//!   errors.
//! - Front-ends usually import `optimization::prelude::*`.

pub mod errors;
pub mod problem;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::problem::prelude::*;
}
