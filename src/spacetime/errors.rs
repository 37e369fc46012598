//! Errors for the space-time likelihood and its objective interface.
//!
//! Shape and data problems are configuration errors surfaced before any
//! evaluation. `InvalidParameter` flags NaN parameters (a caller bug), while
//! `Infeasible` is only produced by derivative requests at parameters where
//! the objective itself is `+inf`; plain evaluations report infeasibility
//! through their status instead.
use crate::gmrf::GmrfError;
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

/// Result alias for space-time likelihood operations.
pub type SpaceTimeResult<T> = Result<T, SpaceTimeError>;

#[derive(Debug, Clone, PartialEq)]
pub enum SpaceTimeError {
    // ---- Data ----
    /// Observation matrix rows must equal the node count.
    DataShapeMismatch { expected_rows: usize, rows: usize },

    /// Observed values must be finite; missing cells are NaN.
    NonFiniteObservation { node: usize, time: usize, value: f64 },

    // ---- Random effects ----
    /// `psi` must have one entry per node.
    PsiLengthMismatch { expected: usize, actual: usize },

    /// `omega` must be `n_nodes x n_t`.
    OmegaShapeMismatch { expected: (usize, usize), actual: (usize, usize) },

    /// Random effects must be finite when effect validation is enabled.
    NonFiniteEffect { field: &'static str, index: usize, value: f64 },

    // ---- Parameters ----
    /// Parameter is NaN.
    InvalidParameter { name: &'static str, value: f64 },

    /// Flat parameter vector has the wrong length.
    ParameterLengthMismatch { expected: usize, actual: usize },

    /// Requested `(node, time)` cell lies outside the `n_nodes x n_t` grid.
    CellOutOfRange { node: usize, time: usize, n_nodes: usize, n_t: usize },

    // ---- Options ----
    /// Unrecognized GMRF backend name.
    UnknownBackend { name: String },

    // ---- Evaluation ----
    /// Objective is not finite at the requested parameters.
    Infeasible { reason: String },

    /// Internal GMRF evaluation failure.
    Gmrf(GmrfError),
}

impl std::error::Error for SpaceTimeError {}

impl std::fmt::Display for SpaceTimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpaceTimeError::DataShapeMismatch { expected_rows, rows } => {
                write!(f, "Observation matrix must have {expected_rows} rows (one per node); got: {rows}")
            }
            SpaceTimeError::NonFiniteObservation { node, time, value } => {
                write!(f, "Observation at node {node}, time {time} must be finite or missing; got: {value}")
            }
            SpaceTimeError::PsiLengthMismatch { expected, actual } => {
                write!(f, "Spatial effect psi must have length {expected}; got: {actual}")
            }
            SpaceTimeError::OmegaShapeMismatch { expected, actual } => {
                write!(
                    f,
                    "Space-time effect omega must have shape {}x{}; got: {}x{}",
                    expected.0, expected.1, actual.0, actual.1
                )
            }
            SpaceTimeError::NonFiniteEffect { field, index, value } => {
                write!(f, "Random effect {field}[{index}] must be finite; got: {value}")
            }
            SpaceTimeError::InvalidParameter { name, value } => {
                write!(f, "Parameter {name} must not be NaN; got: {value}")
            }
            SpaceTimeError::ParameterLengthMismatch { expected, actual } => {
                write!(f, "Parameter vector must have length {expected}; got: {actual}")
            }
            SpaceTimeError::CellOutOfRange { node, time, n_nodes, n_t } => {
                write!(f, "Cell ({node}, {time}) is outside the {n_nodes}x{n_t} grid")
            }
            SpaceTimeError::UnknownBackend { name } => {
                write!(f, "Unknown GMRF backend '{name}'; expected 'factored' or 'cholesky'")
            }
            SpaceTimeError::Infeasible { reason } => {
                write!(f, "Objective is not finite at the given parameters: {reason}")
            }
            SpaceTimeError::Gmrf(err) => write!(f, "{err}"),
        }
    }
}

impl From<GmrfError> for SpaceTimeError {
    fn from(err: GmrfError) -> Self {
        SpaceTimeError::Gmrf(err)
    }
}

#[cfg(feature = "python-bindings")]
impl std::convert::From<SpaceTimeError> for PyErr {
    fn from(err: SpaceTimeError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
