//! rust_streamnet — space-time Gaussian likelihood on directed stream networks.
//!
//! Purpose
//! -------
//! Evaluate the joint negative log-likelihood of a spatio-temporal latent
//! Gaussian model on a tree-structured flow network, together with its exact
//! gradient and a report of intermediate quantities, so that an external
//! optimizer or Laplace-approximation host can fit it. When the
//! `python-bindings` feature is enabled, the `_rust_streamnet` extension
//! module exposes the model to Python.
//!
//! Key behaviors
//! -------------
//! - `network` validates the edge lists, flows, and sources of a directed
//!   acyclic flow network.
//! - `precision` builds the sparse tail-up precision
//!   `Q = (I - Gamma)^T V (I - Gamma)` from the network and a decay rate.
//! - `gmrf` evaluates GMRF negative log-densities under `Q`, either through
//!   the factored form or a sparse Cholesky factor.
//! - `spacetime` assembles the spatial, temporal, and observation terms of
//!   the joint NLL and its gradient.
//! - `objective` exposes evaluation, reports, and the flat parameter layout.
//! - `optimization` adapts the objective to argmin solvers.
//!
//! Conventions
//! -----------
//! - Configuration errors are returned as `Err`; numerical infeasibility is
//!   an `Ok` evaluation with value `+inf`.
//! - Logging goes through `tracing`; the crate never installs a subscriber.
//! - Errors from core Rust code are converted to `PyErr` only at the PyO3
//!   boundary.

pub mod gmrf;
pub mod network;
pub mod objective;
pub mod optimization;
pub mod precision;
pub mod spacetime;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    network::FlowNetwork,
    objective::{EvalOptions, GmrfBackend, SpaceTimeModel},
    spacetime::data::SpaceTimeData,
    utils::{extract_f64_matrix, extract_f64_vector, matrix_to_rows},
};

/// StreamNetworkModel — Python-facing wrapper around [`SpaceTimeModel`].
///
/// Purpose
/// -------
/// Let a Python host optimizer evaluate the space-time objective, its
/// components, its gradient, and the fitted mean at a flat parameter vector.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `StreamNetworkModel(from_e, to_e, dist_e, flow_n, source_s, y, backend="factored", validate_effects=True)`:
/// - `from_e`, `to_e`: sequences of node indices, one per edge.
/// - `dist_e`: array-like of edge distances.
/// - `flow_n`: array-like of node flows.
/// - `source_s`: sequence of source node indices.
/// - `y`: 2-D array-like `N x T`, NaN for missing cells.
///
/// Notes
/// -----
/// - Flat vectors follow [`ParameterLayout`](crate::objective::ParameterLayout):
///   `[log_theta, log_sigma_y, alpha, log_beta1, log_beta2, psi, omega]`
///   with `omega` column-major.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_streamnet.models")]
pub struct StreamNetworkModel {
    inner: SpaceTimeModel,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl StreamNetworkModel {
    #[new]
    #[pyo3(
        signature = (from_e, to_e, dist_e, flow_n, source_s, y, backend = None, validate_effects = None),
        text_signature = "(from_e, to_e, dist_e, flow_n, source_s, y, /, backend='factored', validate_effects=True)"
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn new<'py>(
        py: Python<'py>, from_e: Vec<usize>, to_e: Vec<usize>, dist_e: &Bound<'py, PyAny>,
        flow_n: &Bound<'py, PyAny>, source_s: Vec<usize>, y: &Bound<'py, PyAny>,
        backend: Option<&str>, validate_effects: Option<bool>,
    ) -> PyResult<Self> {
        let dist_e = extract_f64_vector(py, dist_e)?;
        let flow_n = extract_f64_vector(py, flow_n)?;
        let network = FlowNetwork::new(from_e, to_e, dist_e, flow_n, source_s)?;
        let data = SpaceTimeData::new(extract_f64_matrix(y)?)?;
        let backend = match backend {
            Some(name) => name.parse::<GmrfBackend>()?,
            None => GmrfBackend::default(),
        };
        let options = EvalOptions::new(backend, validate_effects.unwrap_or(true));
        Ok(StreamNetworkModel { inner: SpaceTimeModel::new(network, data, options)? })
    }

    /// Length of the flat parameter vector.
    #[getter]
    pub fn n_params(&self) -> usize {
        self.inner.layout().len()
    }

    /// Length of the random-effect block `[psi, omega]`.
    #[getter]
    pub fn n_random(&self) -> usize {
        self.inner.layout().n_random()
    }

    /// Joint NLL at a flat parameter vector; `inf` when infeasible.
    pub fn objective<'py>(&self, py: Python<'py>, params: &Bound<'py, PyAny>) -> PyResult<f64> {
        let flat = extract_f64_vector(py, params)?;
        Ok(self.inner.evaluate_flat(flat.view())?.value)
    }

    /// `(spatial, temporal, observation)` NLL components, or `None` when the
    /// precision could not be built.
    pub fn jnll<'py>(
        &self, py: Python<'py>, params: &Bound<'py, PyAny>,
    ) -> PyResult<Option<(f64, f64, f64)>> {
        let flat = extract_f64_vector(py, params)?;
        let eval = self.inner.evaluate_flat(flat.view())?;
        Ok(eval.jnll.map(|j| (j.spatial, j.temporal, j.observation)))
    }

    /// Exact gradient at a flat parameter vector.
    pub fn gradient<'py>(
        &self, py: Python<'py>, params: &Bound<'py, PyAny>,
    ) -> PyResult<Vec<f64>> {
        let flat = extract_f64_vector(py, params)?;
        Ok(self.inner.gradient_flat(flat.view())?.to_flat().to_vec())
    }

    /// Fitted mean `z` as `N` rows of length `T`.
    pub fn fitted_mean<'py>(
        &self, py: Python<'py>, params: &Bound<'py, PyAny>,
    ) -> PyResult<Vec<Vec<f64>>> {
        let flat = extract_f64_vector(py, params)?;
        let (p, fx) = self.inner.layout().split(flat.view())?;
        let fitted = self.inner.fitted_mean(&p, &fx)?;
        Ok(matrix_to_rows(&fitted.z))
    }
}

/// `_rust_streamnet` — extension module initializer.
///
/// Registers the `models` submodule and inserts it into `sys.modules` so
/// that `rust_streamnet.models` imports with dot notation.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_streamnet<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let models_mod = PyModule::new(_py, "models")?;
    models(_py, m, &models_mod)?;

    _py.import("sys")?.getattr("modules")?.set_item("rust_streamnet.models", models_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn models<'py>(
    _py: Python, rust_streamnet: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<StreamNetworkModel>()?;
    rust_streamnet.add_submodule(m)?;
    Ok(())
}
