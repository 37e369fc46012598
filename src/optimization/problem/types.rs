//! problem::types — numeric aliases for the objective adapters.
//!
//! `Theta` is the flat vector an optimizer moves through: either the full
//! parameter vector in [`ParameterLayout`](crate::objective::ParameterLayout)
//! order or the random-effect block alone. `Cost` is the joint negative
//! log-likelihood; no sign flip happens anywhere in this module.
use ndarray::Array1;

/// Flat parameter vector.
pub type Theta = Array1<f64>;

/// Gradient of the cost with respect to `Theta`.
pub type Grad = Array1<f64>;

/// Scalar cost (joint negative log-likelihood).
pub type Cost = f64;
