//! CholeskyGmrf — GMRF density through a sparse Cholesky factor of `Q`.
//!
//! Purpose
//! -------
//! Evaluate the scaled GMRF NLL from the assembled sparse precision, the way a
//! generic GMRF evaluator would: factor `Q = L L^T`, take
//! `log|Q| = 2 * sum_i ln L_ii`, and form `x'Qx` by a sparse mat-vec.
//!
//! Key behaviors
//! -------------
//! - [`CholeskyGmrf::factor`] performs a one-off factorization.
//! - [`CholeskyCache`] keeps the symbolic analysis between calls and only
//!   refactors numerically while the sparsity pattern of `Q` is unchanged.
//!   The pattern depends on the network topology alone, so repeated
//!   evaluations at different `theta` reuse it.
//!
//! Invariants & assumptions
//! ------------------------
//! - `Q` is symmetric; the factorization does not check symmetry.
//! - A failed factorization clears the cache, so the next call starts from a
//!   fresh symbolic analysis.
use crate::{
    gmrf::{
        density::{GmrfDensity, validate_dim},
        errors::{GmrfError, GmrfResult},
    },
    precision::NetworkPrecision,
};
use nalgebra_sparse::{csc::CscMatrix, factorization::CscCholesky, pattern::SparsityPattern};
use ndarray::ArrayView1;

#[derive(Debug, Clone, Copy)]
pub struct CholeskyGmrf<'a> {
    q: &'a CscMatrix<f64>,
    log_det: f64,
}

impl<'a> CholeskyGmrf<'a> {
    /// Factor the precision of `precision` from scratch.
    ///
    /// Errors
    /// ------
    /// - `GmrfError::NotPositiveDefinite` when the factorization fails.
    pub fn factor(precision: &'a NetworkPrecision) -> GmrfResult<Self> {
        let q = precision.q();
        let chol = CscCholesky::factor(q).map_err(|_| GmrfError::NotPositiveDefinite)?;
        Ok(CholeskyGmrf { q, log_det: factor_log_det(chol.l()) })
    }

    /// Factor through `cache`, reusing its symbolic analysis when possible.
    pub fn with_cache(
        precision: &'a NetworkPrecision, cache: &mut CholeskyCache,
    ) -> GmrfResult<Self> {
        let q = precision.q();
        let log_det = cache.factorize(q)?;
        Ok(CholeskyGmrf { q, log_det })
    }
}

impl GmrfDensity for CholeskyGmrf<'_> {
    fn dim(&self) -> usize {
        self.q.nrows()
    }

    fn log_det(&self) -> f64 {
        self.log_det
    }

    fn quad_form(&self, x: ArrayView1<'_, f64>) -> GmrfResult<f64> {
        validate_dim(self.dim(), x.len())?;
        let mut qx = vec![0.0; x.len()];
        for (row, col, value) in self.q.triplet_iter() {
            qx[row] += value * x[col];
        }
        Ok(qx.iter().zip(x.iter()).map(|(a, b)| a * b).sum())
    }
}

/// Reusable Cholesky state for repeated evaluations on one topology.
///
/// Counters record how many full (symbolic + numeric) factorizations and how
/// many numeric-only refactorizations were performed.
#[derive(Default)]
pub struct CholeskyCache {
    factor: Option<CscCholesky<f64>>,
    pattern: Option<SparsityPattern>,
    full_factorizations: usize,
    refactorizations: usize,
}

impl std::fmt::Debug for CholeskyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CholeskyCache")
            .field("cached", &self.factor.is_some())
            .field("full_factorizations", &self.full_factorizations)
            .field("refactorizations", &self.refactorizations)
            .finish()
    }
}

impl CholeskyCache {
    pub fn new() -> Self {
        CholeskyCache::default()
    }

    pub fn full_factorizations(&self) -> usize {
        self.full_factorizations
    }

    pub fn refactorizations(&self) -> usize {
        self.refactorizations
    }

    pub fn is_empty(&self) -> bool {
        self.factor.is_none()
    }

    /// Drop the cached factor and pattern.
    pub fn clear(&mut self) {
        self.factor = None;
        self.pattern = None;
    }

    /// Factor `q` and return `log|q|`.
    pub fn factorize(&mut self, q: &CscMatrix<f64>) -> GmrfResult<f64> {
        let reusable = self.pattern.as_ref() == Some(q.pattern());
        let factor = match (reusable, self.factor.take()) {
            (true, Some(mut chol)) => {
                if chol.refactor(q.values()).is_err() {
                    self.clear();
                    return Err(GmrfError::NotPositiveDefinite);
                }
                self.refactorizations += 1;
                chol
            }
            _ => {
                let chol = match CscCholesky::factor(q) {
                    Ok(chol) => chol,
                    Err(_) => {
                        self.clear();
                        return Err(GmrfError::NotPositiveDefinite);
                    }
                };
                self.pattern = Some(q.pattern().clone());
                self.full_factorizations += 1;
                chol
            }
        };
        let log_det = factor_log_det(factor.l());
        self.factor = Some(factor);
        Ok(log_det)
    }
}

/// `2 * sum_i ln L_ii` for a lower Cholesky factor.
fn factor_log_det(l: &CscMatrix<f64>) -> f64 {
    2.0 * l.triplet_iter().filter(|(i, j, _)| i == j).map(|(_, _, v)| v.ln()).sum::<f64>()
}
