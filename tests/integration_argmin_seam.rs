//! Integration tests for the argmin seam of the objective.
//!
//! Purpose
//! -------
//! - Exercise the objective the way an external host optimizer sees it:
//!   through argmin's `CostFunction` and `Gradient` traits over the full
//!   flat vector and over the random-effect block.
//!
//! Coverage
//! --------
//! - `optimization::problem`: `ObjectiveProblem` and `RandomEffectsProblem`
//!   cost and gradient, and error recovery through `OptError::from`.
//!
//! Exclusions
//! ----------
//! - Running a solver; choosing and configuring one stays with the host.
use approx::assert_abs_diff_eq;
use argmin::core::{CostFunction, Error, Gradient};
use ndarray::{Array1, Array2, array};
use rust_streamnet::{
    network::FlowNetwork,
    objective::{EvalOptions, GmrfBackend, SpaceTimeModel},
    optimization::prelude::*,
    spacetime::{MISSING, RandomEffects, SpaceTimeData, SpaceTimeError, SpaceTimeParams},
};

fn model(backend: GmrfBackend) -> SpaceTimeModel {
    let net = FlowNetwork::new(
        vec![0, 1, 2, 3],
        vec![2, 2, 3, 4],
        array![1.0, 0.6, 1.4, 0.9],
        array![1.0, 1.5, 2.5, 3.0, 3.2],
        vec![0, 1],
    )
    .unwrap();
    let y = array![
        [0.5, 0.7, 0.2, 0.4],
        [1.0, MISSING, 0.9, 1.1],
        [0.8, 0.6, MISSING, 0.5],
        [0.3, 0.4, 0.6, 0.2],
        [MISSING, 0.1, 0.3, 0.2]
    ];
    let data = SpaceTimeData::new(y).unwrap();
    SpaceTimeModel::new(net, data, EvalOptions::new(backend, true)).unwrap()
}

fn effects() -> RandomEffects {
    let omega = Array2::from_shape_fn((5, 4), |(n, t)| 0.05 * (n as f64) - 0.02 * (t as f64));
    RandomEffects::new(array![0.1, -0.2, 0.0, 0.15, -0.05], omega).unwrap()
}

#[test]
// Purpose
// -------
// The full-vector problem reports the model value and analytic gradient
// through argmin's traits, for both backends.
//
// Expect
// ------
// - `cost` equals `evaluate_flat(...).value`.
// - `gradient` agrees with finite differences to 1e-5.
fn objective_problem_exposes_value_and_gradient() {
    for backend in [GmrfBackend::Factored, GmrfBackend::Cholesky] {
        let m = model(backend);
        let layout = m.layout();
        let params = SpaceTimeParams::new(-0.4, -0.3, 0.2, 0.1, 0.3);
        let theta = layout.flatten(&params, &effects());

        let problem = ObjectiveProblem::new(&m);
        let cost = problem.cost(&theta).unwrap();
        assert_eq!(cost, m.evaluate_flat(theta.view()).unwrap().value);

        let analytic = problem.gradient(&theta).unwrap();
        let numeric = fd_gradient(&theta, |x: &Theta| problem.value(x)).unwrap();
        assert_eq!(analytic.len(), layout.len());
        for (a, n) in analytic.iter().zip(numeric.iter()) {
            assert_abs_diff_eq!(*a, *n, epsilon = 1e-5);
        }
    }
}

#[test]
// Purpose
// -------
// The random-effect problem is the full problem restricted to `[psi, omega]`.
//
// Given
// -----
// - Fixed parameters held constant, random effects from `effects()`.
//
// Expect
// ------
// - `dim()` is `N + N*T = 25`.
// - The cost matches the full-vector cost at the same point.
// - The gradient equals the trailing block of the full gradient and agrees
//   with finite differences to 1e-5.
fn random_effects_problem_restricts_full_problem() {
    let m = model(GmrfBackend::Factored);
    let params = SpaceTimeParams::new(0.3, -1.2, 0.5, -0.2, 0.4);
    let fx = effects();
    let full = m.layout().flatten(&params, &fx);

    let inner = RandomEffectsProblem::new(&m, &params);
    assert_eq!(inner.dim(), 25);
    let theta: Array1<f64> = full.slice(ndarray::s![5..]).to_owned();
    assert_eq!(inner.cost(&theta).unwrap(), ObjectiveProblem::new(&m).cost(&full).unwrap());

    let analytic = inner.gradient(&theta).unwrap();
    let full_grad = ObjectiveProblem::new(&m).gradient(&full).unwrap();
    for (a, b) in analytic.iter().zip(full_grad.iter().skip(5)) {
        assert_eq!(*a, *b);
    }
    let numeric = inner.fd_grad(&theta).unwrap();
    for (a, n) in analytic.iter().zip(numeric.iter()) {
        assert_abs_diff_eq!(*a, *n, epsilon = 1e-5);
    }
}

#[test]
// Purpose
// -------
// Errors boxed into argmin's error type come back as `OptError`.
//
// Given
// -----
// - A random-effect vector three entries short.
// - Fixed parameters with log_theta = 1000 (infeasible).
//
// Expect
// ------
// - `OptError::Model { source: ParameterLengthMismatch }`.
// - `OptError::NonFiniteCost { value: inf }`.
fn boxed_errors_recover_their_variants() {
    let m = model(GmrfBackend::Factored);
    let params = SpaceTimeParams::new(0.0, 0.0, 0.0, 0.0, 0.0);
    let inner = RandomEffectsProblem::new(&m, &params);
    let err: Error = inner.cost(&Array1::zeros(22)).unwrap_err();
    assert!(matches!(
        OptError::from(err),
        OptError::Model { source: SpaceTimeError::ParameterLengthMismatch { .. } }
    ));

    let infeasible = SpaceTimeParams::new(1000.0, 0.0, 0.0, 0.0, 0.0);
    let inner = RandomEffectsProblem::new(&m, &infeasible);
    let err: Error = inner.cost(&Array1::zeros(25)).unwrap_err();
    assert_eq!(OptError::from(err), OptError::NonFiniteCost { value: f64::INFINITY });
}
