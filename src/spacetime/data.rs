//! Observation container for space-time data.
//!
//! Purpose
//! -------
//! Hold the `N x T` observation matrix `y[n, t]` with missing cells coded as
//! [`MISSING`] (`NaN`). Missing cells contribute nothing to the likelihood;
//! they are not an error.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every non-missing entry is finite; `±inf` is rejected at construction.
//! - `n_t = y.ncols()`. `n_t == 0` is allowed and yields an empty temporal
//!   and observation term.
//!
//! Conventions
//! -----------
//! - Rows index nodes, columns index time steps (0-based).
//! - The node count is checked against the network by the model, not here.
use crate::spacetime::errors::{SpaceTimeError, SpaceTimeResult};
use ndarray::Array2;

/// Missing-observation marker.
pub const MISSING: f64 = f64::NAN;

/// `SpaceTimeData` — observations `y[n, t]` with NaN-coded missing cells.
///
/// Fields
/// ------
/// - `y`: `Array2<f64>`
///   Observation matrix (`n_nodes x n_t`).
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceTimeData {
    y: Array2<f64>,
}

impl SpaceTimeData {
    /// Construct from a NaN-coded observation matrix.
    ///
    /// Errors
    /// ------
    /// - `SpaceTimeError::NonFiniteObservation` for the first `±inf` entry,
    ///   scanning nodes then time.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::array;
    /// # use rust_streamnet::spacetime::data::{SpaceTimeData, MISSING};
    /// let data = SpaceTimeData::new(array![[1.0, MISSING], [0.5, 2.0]]).unwrap();
    /// assert_eq!(data.n_t(), 2);
    /// assert_eq!(data.n_observed(), 3);
    /// assert!(data.is_missing(0, 1));
    /// ```
    pub fn new(y: Array2<f64>) -> SpaceTimeResult<Self> {
        for ((node, time), &value) in y.indexed_iter() {
            if value.is_infinite() {
                return Err(SpaceTimeError::NonFiniteObservation { node, time, value });
            }
        }
        Ok(SpaceTimeData { y })
    }

    /// Construct from explicit optional cells; `None` becomes [`MISSING`].
    pub fn from_options(cells: &Array2<Option<f64>>) -> SpaceTimeResult<Self> {
        SpaceTimeData::new(cells.map(|cell| cell.unwrap_or(MISSING)))
    }

    pub fn y(&self) -> &Array2<f64> {
        &self.y
    }

    pub fn n_nodes(&self) -> usize {
        self.y.nrows()
    }

    pub fn n_t(&self) -> usize {
        self.y.ncols()
    }

    pub fn is_missing(&self, node: usize, time: usize) -> bool {
        self.y[[node, time]].is_nan()
    }

    /// Number of non-missing cells.
    pub fn n_observed(&self) -> usize {
        self.y.iter().filter(|v| !v.is_nan()).count()
    }

    /// Observed cells as `(node, time, value)`, nodes outermost.
    pub fn observed(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.y
            .indexed_iter()
            .filter(|(_, v)| !v.is_nan())
            .map(|((node, time), &value)| (node, time, value))
    }
}
