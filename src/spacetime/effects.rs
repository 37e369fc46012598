//! Random effects `psi` (spatial) and `omega` (space-time).
use crate::spacetime::errors::{SpaceTimeError, SpaceTimeResult};
use ndarray::{Array1, Array2};

/// `RandomEffects` — latent fields integrated out by a Laplace-type host.
///
/// - `psi`: `Array1<f64>` of length `n_nodes`.
/// - `omega`: `Array2<f64>` of shape `n_nodes x n_t`.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomEffects {
    pub psi: Array1<f64>,
    pub omega: Array2<f64>,
}

impl RandomEffects {
    /// Pair `psi` with `omega`, checking that their node counts agree.
    pub fn new(psi: Array1<f64>, omega: Array2<f64>) -> SpaceTimeResult<Self> {
        if psi.len() != omega.nrows() {
            return Err(SpaceTimeError::PsiLengthMismatch {
                expected: omega.nrows(),
                actual: psi.len(),
            });
        }
        Ok(RandomEffects { psi, omega })
    }

    pub fn zeros(n_nodes: usize, n_t: usize) -> Self {
        RandomEffects { psi: Array1::zeros(n_nodes), omega: Array2::zeros((n_nodes, n_t)) }
    }

    pub fn n_nodes(&self) -> usize {
        self.psi.len()
    }

    pub fn n_t(&self) -> usize {
        self.omega.ncols()
    }

    /// Total number of random-effect coordinates, `N + N * T`.
    pub fn len(&self) -> usize {
        self.psi.len() + self.omega.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check dimensions against a model with `n_nodes` nodes and `n_t` steps.
    pub fn validate_shape(&self, n_nodes: usize, n_t: usize) -> SpaceTimeResult<()> {
        if self.psi.len() != n_nodes {
            return Err(SpaceTimeError::PsiLengthMismatch {
                expected: n_nodes,
                actual: self.psi.len(),
            });
        }
        if self.omega.dim() != (n_nodes, n_t) {
            return Err(SpaceTimeError::OmegaShapeMismatch {
                expected: (n_nodes, n_t),
                actual: self.omega.dim(),
            });
        }
        Ok(())
    }

    /// Reject non-finite entries; `omega` indices are column-major.
    pub fn validate_finite(&self) -> SpaceTimeResult<()> {
        if let Some((index, &value)) = self.psi.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(SpaceTimeError::NonFiniteEffect { field: "psi", index, value });
        }
        let n = self.omega.nrows();
        for ((node, time), &value) in self.omega.indexed_iter() {
            if !value.is_finite() {
                return Err(SpaceTimeError::NonFiniteEffect {
                    field: "omega",
                    index: time * n + node,
                    value,
                });
            }
        }
        Ok(())
    }
}
