//! problem — argmin seam for the space-time objective.
//!
//! - `adapter`: `CostFunction`/`Gradient` over the full flat vector or the
//!   random-effect block.
//! - `finite_diff`: finite-difference gradients for derivative checks.
//! - `types`/`validation`: numeric aliases and input/output checks.

pub mod adapter;
pub mod finite_diff;
pub mod types;
pub mod validation;

pub mod prelude {
    pub use super::adapter::{ObjectiveProblem, RandomEffectsProblem};
    pub use super::finite_diff::fd_gradient;
    pub use super::types::{Cost, Grad, Theta};
}
