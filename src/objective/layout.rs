//! ParameterLayout — mapping between the flat parameter vector and the
//! structured model inputs.
//!
//! Layout
//! ------
//! ```text
//! [log_theta, log_sigma_y, alpha, log_beta1, log_beta2,
//!  psi[0..N],
//!  omega[:,0], omega[:,1], ..., omega[:,T-1]]
//! ```
//!
//! `omega` is stored column-major: time step `t` occupies one contiguous
//! block of `N` entries. The random-effect block alone (the vector a
//! Laplace-type host integrates over) starts at `psi[0]`.
use crate::spacetime::{
    effects::RandomEffects,
    errors::{SpaceTimeError, SpaceTimeResult},
    params::{N_FIXED, SpaceTimeParams},
};
use ndarray::{Array1, Array2, ArrayView1, s};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterLayout {
    n_nodes: usize,
    n_t: usize,
}

impl ParameterLayout {
    pub fn new(n_nodes: usize, n_t: usize) -> Self {
        ParameterLayout { n_nodes, n_t }
    }

    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    pub fn n_t(&self) -> usize {
        self.n_t
    }

    pub fn n_fixed(&self) -> usize {
        N_FIXED
    }

    /// `N + N * T`.
    pub fn n_random(&self) -> usize {
        self.n_nodes * (1 + self.n_t)
    }

    /// Full flat length.
    pub fn len(&self) -> usize {
        N_FIXED + self.n_random()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn alpha_index(&self) -> usize {
        2
    }

    pub fn psi_index(&self, node: usize) -> usize {
        N_FIXED + node
    }

    pub fn omega_index(&self, node: usize, time: usize) -> usize {
        N_FIXED + self.n_nodes + time * self.n_nodes + node
    }

    /// Split a full flat vector into fixed parameters and random effects.
    ///
    /// Errors
    /// ------
    /// - `SpaceTimeError::ParameterLengthMismatch` for a wrong length.
    /// - `SpaceTimeError::InvalidParameter` for a NaN fixed parameter.
    pub fn split(
        &self, flat: ArrayView1<'_, f64>,
    ) -> SpaceTimeResult<(SpaceTimeParams, RandomEffects)> {
        self.check_len(self.len(), flat.len())?;
        let fixed = flat.slice(s![..N_FIXED]).to_vec();
        let params = SpaceTimeParams::from_slice(&fixed)?;
        let effects = self.split_random(flat.slice(s![N_FIXED..]))?;
        Ok((params, effects))
    }

    /// Read random effects from the `[psi, omega]` block alone.
    pub fn split_random(&self, flat: ArrayView1<'_, f64>) -> SpaceTimeResult<RandomEffects> {
        self.check_len(self.n_random(), flat.len())?;
        let n = self.n_nodes;
        let psi = flat.slice(s![..n]).to_owned();
        let mut omega = Array2::<f64>::zeros((n, self.n_t));
        for t in 0..self.n_t {
            let start = n + t * n;
            omega.column_mut(t).assign(&flat.slice(s![start..start + n]));
        }
        Ok(RandomEffects { psi, omega })
    }

    /// Inverse of [`ParameterLayout::split`].
    pub fn flatten(&self, params: &SpaceTimeParams, effects: &RandomEffects) -> Array1<f64> {
        let mut flat = Array1::<f64>::zeros(self.len());
        flat.slice_mut(s![..N_FIXED]).assign(&params.to_array());
        flat.slice_mut(s![N_FIXED..]).assign(&self.flatten_random(effects));
        flat
    }

    /// Inverse of [`ParameterLayout::split_random`].
    pub fn flatten_random(&self, effects: &RandomEffects) -> Array1<f64> {
        let n = self.n_nodes;
        let mut flat = Array1::<f64>::zeros(self.n_random());
        flat.slice_mut(s![..n]).assign(&effects.psi);
        for t in 0..self.n_t {
            let start = n + t * n;
            flat.slice_mut(s![start..start + n]).assign(&effects.omega.column(t));
        }
        flat
    }

    fn check_len(&self, expected: usize, actual: usize) -> SpaceTimeResult<()> {
        if expected != actual {
            return Err(SpaceTimeError::ParameterLengthMismatch { expected, actual });
        }
        Ok(())
    }
}
