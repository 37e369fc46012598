//! Triplet accumulation for sparse matrices.
//!
//! Sparse structures are assembled from an explicit list of
//! `(row, col, value)` triplets. Duplicate coordinates are summed exactly once
//! during conversion to compressed-sparse-column form, so the result does not
//! depend on insertion order semantics (several edges sharing a downstream
//! node all contribute).
use crate::precision::errors::{PrecisionError, PrecisionResult};
use nalgebra_sparse::{coo::CooMatrix, csc::CscMatrix};

/// Growable list of `(row, col, value)` triplets for an `nrows × ncols` matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct TripletList {
    nrows: usize,
    ncols: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<f64>,
}

impl TripletList {
    pub fn new(nrows: usize, ncols: usize) -> Self {
        TripletList { nrows, ncols, rows: Vec::new(), cols: Vec::new(), values: Vec::new() }
    }

    pub fn with_capacity(nrows: usize, ncols: usize, capacity: usize) -> Self {
        TripletList {
            nrows,
            ncols,
            rows: Vec::with_capacity(capacity),
            cols: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Append a contribution at `(row, col)`; duplicates are summed later.
    pub fn push(&mut self, row: usize, col: usize, value: f64) {
        self.rows.push(row);
        self.cols.push(col);
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Group by coordinate, sum, and compress into a CSC matrix.
    ///
    /// # Errors
    /// - [`PrecisionError::SparseFormat`] if a triplet lies outside the
    ///   declared shape.
    pub fn into_csc(self) -> PrecisionResult<CscMatrix<f64>> {
        let coo =
            CooMatrix::try_from_triplets(self.nrows, self.ncols, self.rows, self.cols, self.values)
                .map_err(|err| PrecisionError::SparseFormat { text: err.to_string() })?;
        Ok(CscMatrix::from(&coo))
    }
}

/// Value stored at `(row, col)`, with structural zeros reported as `0.0`.
pub fn csc_entry(matrix: &CscMatrix<f64>, row: usize, col: usize) -> f64 {
    matrix.get_entry(row, col).map(|entry| entry.into_value()).unwrap_or(0.0)
}

/// Diagonal `nrows × nrows` CSC matrix from a slice of values.
pub fn csc_diagonal(values: &[f64]) -> PrecisionResult<CscMatrix<f64>> {
    let n = values.len();
    let mut triplets = TripletList::with_capacity(n, n, n);
    for (i, &value) in values.iter().enumerate() {
        triplets.push(i, i, value);
    }
    triplets.into_csc()
}
