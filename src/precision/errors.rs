//! Errors for precision-matrix construction.
//!
//! [`PrecisionError`] covers the decay rate handed to the builder, the
//! positivity precondition on conditional variances, and sparse-format
//! failures while assembling `Gamma`, `V`, and `Q`. A non-positive
//! conditional variance at a feasible network is a parameter-driven
//! failure (e.g. `theta` underflowing to zero) and is reported here rather
//! than producing an infinite precision.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

/// Result alias for precision-matrix construction.
pub type PrecisionResult<T> = Result<T, PrecisionError>;

/// Failures raised while building the network precision matrix.
#[derive(Debug, Clone, PartialEq)]
pub enum PrecisionError {
    /// Spatial decay rate must be finite and > 0.
    InvalidDecayRate { value: f64 },

    /// Accumulated conditional variance is not strictly positive and finite.
    NonPositiveVariance { node: usize, value: f64 },

    /// Sparse triplets could not be assembled into a matrix.
    SparseFormat { text: String },
}

impl std::error::Error for PrecisionError {}

impl std::fmt::Display for PrecisionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrecisionError::InvalidDecayRate { value } => {
                write!(f, "Spatial decay rate theta must be finite and > 0; got: {value}")
            }
            PrecisionError::NonPositiveVariance { node, value } => {
                write!(
                    f,
                    "Conditional variance at node {node} must be finite and > 0; got: {value}"
                )
            }
            PrecisionError::SparseFormat { text } => {
                write!(f, "Sparse matrix assembly failed: {text}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl std::convert::From<PrecisionError> for PyErr {
    fn from(err: PrecisionError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
