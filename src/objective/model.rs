//! SpaceTimeModel — objective and reporting interface.
//!
//! Purpose
//! -------
//! Bind a validated flow network, an observation matrix, and evaluation
//! options into a model that an external optimizer or Laplace-type host can
//! call repeatedly: evaluate the joint NLL, report intermediates, and return
//! the exact gradient.
//!
//! Key behaviors
//! -------------
//! - [`SpaceTimeModel::evaluate`] is pure; identical inputs give
//!   bit-identical outputs.
//! - Configuration problems (shapes, NaN parameters, non-finite effects when
//!   validation is on) are returned as `Err` before any numerics.
//! - Numerical infeasibility (overflowing parameters, a non-positive
//!   conditional variance, a failed factorization) yields
//!   `Ok(Evaluation)` with `value = +inf` and
//!   [`EvalStatus::Infeasible`]; evaluation never panics on such input.
//! - Gradients and reports at infeasible points return
//!   `SpaceTimeError::Infeasible`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `data.n_nodes() == network.n_nodes()`, checked in
//!   [`SpaceTimeModel::new`].
//! - `n_t` is taken from the data; random effects must match `N x n_t`.
//!
//! Conventions
//! -----------
//! - Logging goes through `tracing`: `debug!` for the NLL components of each
//!   evaluation, `warn!` when an evaluation is infeasible. No subscriber is
//!   installed here.
use crate::{
    gmrf::{CholeskyCache, CholeskyGmrf, FactoredGmrf, GmrfError},
    network::FlowNetwork,
    objective::{
        layout::ParameterLayout,
        options::{EvalOptions, GmrfBackend},
        report::{FittedMean, Report},
    },
    precision::NetworkPrecision,
    spacetime::{
        data::SpaceTimeData,
        effects::RandomEffects,
        errors::{SpaceTimeError, SpaceTimeResult},
        gradient::{JointGradient, joint_gradient},
        likelihood::{JointNll, fitted_mean, joint_nll},
        params::{ModelScale, SpaceTimeParams},
    },
};
use ndarray::{Array1, ArrayView1};
use tracing::{debug, warn};

/// Feasibility of one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalStatus {
    Feasible,
    Infeasible { reason: String },
}

/// `Evaluation` — objective value with its components and status.
///
/// - `jnll`: components, present when the precision could be built and the
///   GMRF densities evaluated.
/// - `value`: `jnll.total()` when feasible, `+inf` otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub jnll: Option<JointNll>,
    pub value: f64,
    pub status: EvalStatus,
}

impl Evaluation {
    fn infeasible(reason: String, jnll: Option<JointNll>) -> Self {
        warn!(%reason, "space-time objective is infeasible");
        Evaluation { jnll, value: f64::INFINITY, status: EvalStatus::Infeasible { reason } }
    }

    pub fn is_feasible(&self) -> bool {
        matches!(self.status, EvalStatus::Feasible)
    }
}

/// `ObjectiveGradient` — objective value with its exact gradient.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveGradient {
    pub value: f64,
    pub gradient: JointGradient,
}

impl ObjectiveGradient {
    /// Full flat gradient in [`ParameterLayout`] order.
    pub fn to_flat(&self) -> Array1<f64> {
        self.gradient.to_flat()
    }

    /// Gradient with respect to the random effects only.
    pub fn random_flat(&self) -> Array1<f64> {
        self.gradient.random_flat()
    }
}

/// Outcome of the shared preparation step.
enum Prepared {
    Ready { scale: ModelScale, precision: NetworkPrecision },
    Infeasible { reason: String },
}

/// `SpaceTimeModel` — joint NLL of the stream-network space-time model.
///
/// Fields
/// ------
/// - `network`: [`FlowNetwork`]
/// - `data`: [`SpaceTimeData`] with `network.n_nodes()` rows.
/// - `options`: [`EvalOptions`]
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceTimeModel {
    network: FlowNetwork,
    data: SpaceTimeData,
    options: EvalOptions,
}

impl SpaceTimeModel {
    /// Bind a network, data, and options.
    ///
    /// Errors
    /// ------
    /// - `SpaceTimeError::DataShapeMismatch` when `data` does not have one row
    ///   per network node.
    pub fn new(
        network: FlowNetwork, data: SpaceTimeData, options: EvalOptions,
    ) -> SpaceTimeResult<Self> {
        if data.n_nodes() != network.n_nodes() {
            return Err(SpaceTimeError::DataShapeMismatch {
                expected_rows: network.n_nodes(),
                rows: data.n_nodes(),
            });
        }
        Ok(SpaceTimeModel { network, data, options })
    }

    pub fn network(&self) -> &FlowNetwork {
        &self.network
    }

    pub fn data(&self) -> &SpaceTimeData {
        &self.data
    }

    pub fn options(&self) -> &EvalOptions {
        &self.options
    }

    pub fn n_nodes(&self) -> usize {
        self.network.n_nodes()
    }

    pub fn n_t(&self) -> usize {
        self.data.n_t()
    }

    pub fn layout(&self) -> ParameterLayout {
        ParameterLayout::new(self.n_nodes(), self.n_t())
    }

    /// Joint NLL at `(params, effects)` with the configured backend.
    pub fn evaluate(
        &self, params: &SpaceTimeParams, effects: &RandomEffects,
    ) -> SpaceTimeResult<Evaluation> {
        self.evaluate_inner(params, effects, self.options.backend, None)
    }

    /// Joint NLL with the Cholesky evaluator, reusing `cache` across calls.
    pub fn evaluate_with_cache(
        &self, params: &SpaceTimeParams, effects: &RandomEffects, cache: &mut CholeskyCache,
    ) -> SpaceTimeResult<Evaluation> {
        self.evaluate_inner(params, effects, GmrfBackend::Cholesky, Some(cache))
    }

    /// Joint NLL at a flat parameter vector (see [`ParameterLayout`]).
    pub fn evaluate_flat(&self, flat: ArrayView1<'_, f64>) -> SpaceTimeResult<Evaluation> {
        let (params, effects) = self.layout().split(flat)?;
        self.evaluate(&params, &effects)
    }

    /// Matrices, vectors, NLL components, and fitted mean at a feasible point.
    pub fn report(
        &self, params: &SpaceTimeParams, effects: &RandomEffects,
    ) -> SpaceTimeResult<Report> {
        let (scale, precision) = self.prepare_feasible(params, effects)?;
        let jnll = joint_nll(&FactoredGmrf::new(&precision), &self.data, &scale, effects)?;
        let z = fitted_mean(scale.alpha, effects.psi.view(), effects.omega.view());
        Ok(Report::new(&precision, jnll, z))
    }

    /// Exact gradient of the joint NLL, together with its value.
    pub fn gradient(
        &self, params: &SpaceTimeParams, effects: &RandomEffects,
    ) -> SpaceTimeResult<ObjectiveGradient> {
        let (scale, precision) = self.prepare_feasible(params, effects)?;
        let jnll = joint_nll(&FactoredGmrf::new(&precision), &self.data, &scale, effects)?;
        let value = jnll.total();
        if !value.is_finite() {
            return Err(SpaceTimeError::Infeasible { reason: format!("objective value {value}") });
        }
        let gradient = joint_gradient(&precision, &self.data, &scale, effects)?;
        Ok(ObjectiveGradient { value, gradient })
    }

    /// Gradient at a flat parameter vector.
    pub fn gradient_flat(&self, flat: ArrayView1<'_, f64>) -> SpaceTimeResult<ObjectiveGradient> {
        let (params, effects) = self.layout().split(flat)?;
        self.gradient(&params, &effects)
    }

    /// Fitted mean `z` with its derivative positions.
    pub fn fitted_mean(
        &self, params: &SpaceTimeParams, effects: &RandomEffects,
    ) -> SpaceTimeResult<FittedMean> {
        params.validate()?;
        effects.validate_shape(self.n_nodes(), self.n_t())?;
        let z = fitted_mean(params.alpha, effects.psi.view(), effects.omega.view());
        Ok(FittedMean::new(z, self.layout()))
    }

    fn evaluate_inner(
        &self, params: &SpaceTimeParams, effects: &RandomEffects, backend: GmrfBackend,
        cache: Option<&mut CholeskyCache>,
    ) -> SpaceTimeResult<Evaluation> {
        let (scale, precision) = match self.prepare(params, effects)? {
            Prepared::Ready { scale, precision } => (scale, precision),
            Prepared::Infeasible { reason } => return Ok(Evaluation::infeasible(reason, None)),
        };

        let jnll = match backend {
            GmrfBackend::Factored => {
                joint_nll(&FactoredGmrf::new(&precision), &self.data, &scale, effects)?
            }
            GmrfBackend::Cholesky => {
                let factored = match cache {
                    Some(cache) => CholeskyGmrf::with_cache(&precision, cache),
                    None => CholeskyGmrf::factor(&precision),
                };
                match factored {
                    Ok(gmrf) => joint_nll(&gmrf, &self.data, &scale, effects)?,
                    Err(GmrfError::NotPositiveDefinite) => {
                        return Ok(Evaluation::infeasible(
                            GmrfError::NotPositiveDefinite.to_string(),
                            None,
                        ));
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        };

        let value = jnll.total();
        debug!(
            spatial = jnll.spatial,
            temporal = jnll.temporal,
            observation = jnll.observation,
            total = value,
            "evaluated space-time objective"
        );
        if !value.is_finite() {
            return Ok(Evaluation::infeasible(format!("objective value {value}"), Some(jnll)));
        }
        Ok(Evaluation { jnll: Some(jnll), value, status: EvalStatus::Feasible })
    }

    fn prepare(
        &self, params: &SpaceTimeParams, effects: &RandomEffects,
    ) -> SpaceTimeResult<Prepared> {
        params.validate()?;
        effects.validate_shape(self.n_nodes(), self.n_t())?;
        if self.options.validate_effects {
            effects.validate_finite()?;
        }
        let scale = params.model_scale();
        if let Some(reason) = scale.infeasibility() {
            return Ok(Prepared::Infeasible { reason });
        }
        match NetworkPrecision::build(&self.network, scale.theta) {
            Ok(precision) => Ok(Prepared::Ready { scale, precision }),
            Err(err) => Ok(Prepared::Infeasible { reason: err.to_string() }),
        }
    }

    fn prepare_feasible(
        &self, params: &SpaceTimeParams, effects: &RandomEffects,
    ) -> SpaceTimeResult<(ModelScale, NetworkPrecision)> {
        match self.prepare(params, effects)? {
            Prepared::Ready { scale, precision } => Ok((scale, precision)),
            Prepared::Infeasible { reason } => Err(SpaceTimeError::Infeasible { reason }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spacetime::data::MISSING;
    use approx::assert_relative_eq;
    use ndarray::{Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Backend agreement through the model interface, with and without a
    //   Cholesky cache.
    // - Infeasible parameters: +inf value, status, and gradient error.
    // - Configuration errors for mismatched data and effect shapes.
    // - Report contents and fitted-mean derivative positions.
    // -------------------------------------------------------------------------

    fn model(backend: GmrfBackend) -> SpaceTimeModel {
        let net = FlowNetwork::new(
            vec![0, 1, 2],
            vec![2, 2, 3],
            array![1.0, 0.5, 2.0],
            array![1.0, 3.0, 4.0, 5.0],
            vec![0, 1],
        )
        .unwrap();
        let data = SpaceTimeData::new(array![
            [0.2, 0.4],
            [MISSING, 1.1],
            [0.9, 0.7],
            [1.2, MISSING]
        ])
        .unwrap();
        SpaceTimeModel::new(net, data, EvalOptions::new(backend, true)).unwrap()
    }

    fn effects() -> RandomEffects {
        RandomEffects::new(
            array![0.1, -0.3, 0.2, 0.0],
            array![[0.05, 0.1], [0.2, 0.1], [-0.1, 0.0], [0.3, 0.35]],
        )
        .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify that both backends and the cached path give the same value.
    //
    // Given
    // -----
    // - The same model under `Factored` and `Cholesky`, three parameter
    //   points evaluated through one cache.
    //
    // Expect
    // ------
    // - Values agree to 1e-10 relative; one full factorization in the cache.
    fn backends_agree_through_model() {
        let fac = model(GmrfBackend::Factored);
        let chol = model(GmrfBackend::Cholesky);
        let fx = effects();
        let mut cache = CholeskyCache::new();
        for log_theta in [-1.0, 0.0, 1.0] {
            let p = SpaceTimeParams::new(log_theta, -0.5, 0.3, 0.2, 0.1);
            let a = fac.evaluate(&p, &fx).unwrap();
            let b = chol.evaluate(&p, &fx).unwrap();
            let c = fac.evaluate_with_cache(&p, &fx, &mut cache).unwrap();
            assert!(a.is_feasible());
            assert_relative_eq!(a.value, b.value, max_relative = 1e-10);
            assert_relative_eq!(a.value, c.value, max_relative = 1e-10);
        }
        assert_eq!(cache.full_factorizations(), 1);
    }

    #[test]
    // Purpose
    // -------
    // Verify infeasible handling.
    //
    // Given
    // -----
    // - log_theta = 1000 (theta overflows) and log_theta = -745 (theta and
    //   the innovation variances are zero or subnormal).
    //
    // Expect
    // ------
    // - `value == +inf`, `EvalStatus::Infeasible`, no panic.
    // - The gradient request returns `SpaceTimeError::Infeasible`.
    fn infeasible_parameters_give_infinite_value() {
        let m = model(GmrfBackend::Factored);
        let fx = effects();
        for log_theta in [1000.0, -745.0] {
            let p = SpaceTimeParams::new(log_theta, 0.0, 0.0, 0.0, 0.0);
            let eval = m.evaluate(&p, &fx).unwrap();
            assert_eq!(eval.value, f64::INFINITY);
            assert!(matches!(eval.status, EvalStatus::Infeasible { .. }));
            assert!(matches!(m.gradient(&p, &fx), Err(SpaceTimeError::Infeasible { .. })));
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that a subnormal precision multiplier is infeasible rather than
    // a configuration error.
    //
    // Given
    // -----
    // - log_beta1 = -710, then log_beta2 = -710, under both backends.
    //
    // Expect
    // ------
    // - `Ok` evaluation with `value == +inf` and `EvalStatus::Infeasible`.
    // - The report request returns `SpaceTimeError::Infeasible`.
    fn subnormal_beta_gives_infinite_value() {
        let fx = effects();
        for backend in [GmrfBackend::Factored, GmrfBackend::Cholesky] {
            let m = model(backend);
            for (log_beta1, log_beta2) in [(-710.0, 0.0), (0.0, -710.0)] {
                let p = SpaceTimeParams::new(0.0, 0.0, 0.0, log_beta1, log_beta2);
                let eval = m.evaluate(&p, &fx).unwrap();
                assert_eq!(eval.value, f64::INFINITY);
                assert!(matches!(eval.status, EvalStatus::Infeasible { .. }));
                assert!(matches!(m.report(&p, &fx), Err(SpaceTimeError::Infeasible { .. })));
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify configuration errors.
    //
    // Expect
    // ------
    // - Data with the wrong row count: `DataShapeMismatch`.
    // - omega with the wrong number of steps: `OmegaShapeMismatch`.
    // - NaN parameter: `InvalidParameter`.
    fn configuration_errors_are_returned() {
        let m = model(GmrfBackend::Factored);
        let err = SpaceTimeModel::new(
            m.network().clone(),
            SpaceTimeData::new(Array2::zeros((3, 2))).unwrap(),
            EvalOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err, SpaceTimeError::DataShapeMismatch { expected_rows: 4, rows: 3 });

        let p = SpaceTimeParams::new(0.0, 0.0, 0.0, 0.0, 0.0);
        let bad = RandomEffects::zeros(4, 3);
        assert!(matches!(m.evaluate(&p, &bad), Err(SpaceTimeError::OmegaShapeMismatch { .. })));

        let nan = SpaceTimeParams::new(0.0, f64::NAN, 0.0, 0.0, 0.0);
        assert!(matches!(
            m.evaluate(&nan, &effects()),
            Err(SpaceTimeError::InvalidParameter { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Verify report contents and fitted-mean derivative positions.
    //
    // Expect
    // ------
    // - Report NLL equals the evaluation; `I` is the identity; `z` matches
    //   alpha + psi + omega.
    // - Jacobian indices of z[2, 1] are [2, 5 + 2, 5 + 4 + 4 + 2].
    fn report_and_fitted_mean_expose_intermediates() {
        let m = model(GmrfBackend::Factored);
        let fx = effects();
        let p = SpaceTimeParams::new(0.2, -0.4, 0.5, 0.0, 0.3);
        let report = m.report(&p, &fx).unwrap();
        let eval = m.evaluate(&p, &fx).unwrap();
        assert_eq!(report.jnll.total(), eval.value);
        assert_eq!(report.identity.nnz(), 4);
        assert_eq!(report.v_n[0], 1.0);
        assert_relative_eq!(report.z[[2, 1]], 0.5 + 0.2 + 0.0, epsilon = 1e-15);
        let q = report.q_dense();
        assert_relative_eq!(q.clone(), q.transpose(), epsilon = 1e-14);

        let fitted = m.fitted_mean(&p, &fx).unwrap();
        assert_eq!(fitted.jacobian_indices(2, 1).unwrap(), [2, 7, 15]);
        assert_eq!(fitted.jacobian_row(2, 1).unwrap().sum(), 3.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify that derivative positions are only given for cells of the grid.
    //
    // Given
    // -----
    // - Four nodes and two time steps.
    //
    // Expect
    // ------
    // - The last cell (3, 1) is accepted.
    // - node = 4 or time = 2: `CellOutOfRange` from both accessors.
    fn fitted_mean_rejects_cells_outside_grid() {
        let m = model(GmrfBackend::Factored);
        let p = SpaceTimeParams::new(0.2, -0.4, 0.5, 0.0, 0.3);
        let fitted = m.fitted_mean(&p, &effects()).unwrap();
        assert_eq!(fitted.jacobian_indices(3, 1).unwrap(), [2, 8, 16]);
        assert_eq!(
            fitted.jacobian_indices(4, 0).unwrap_err(),
            SpaceTimeError::CellOutOfRange { node: 4, time: 0, n_nodes: 4, n_t: 2 }
        );
        assert!(matches!(
            fitted.jacobian_row(0, 2),
            Err(SpaceTimeError::CellOutOfRange { time: 2, .. })
        ));
    }
}
