//! Errors for GMRF density evaluation.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

/// Result alias for GMRF density evaluation.
pub type GmrfResult<T> = Result<T, GmrfError>;

#[derive(Debug, Clone, PartialEq)]
pub enum GmrfError {
    /// Evaluation point length differs from the precision dimension.
    DimensionMismatch { expected: usize, actual: usize },

    /// Sparse Cholesky factorization failed.
    NotPositiveDefinite,

    /// Scale multiplier must be finite and > 0.
    InvalidScale { value: f64 },
}

impl std::error::Error for GmrfError {}

impl std::fmt::Display for GmrfError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GmrfError::DimensionMismatch { expected, actual } => {
                write!(f, "GMRF dimension mismatch: expected {expected}, got {actual}")
            }
            GmrfError::NotPositiveDefinite => {
                write!(f, "Precision matrix is not positive definite")
            }
            GmrfError::InvalidScale { value } => {
                write!(f, "GMRF scale must be finite and > 0; got: {value}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl std::convert::From<GmrfError> for PyErr {
    fn from(err: GmrfError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
