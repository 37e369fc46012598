//! problem::adapter — argmin adapters for the space-time objective.
//!
//! Purpose
//! -------
//! Expose [`SpaceTimeModel`] to argmin solvers through `CostFunction` and
//! `Gradient`, over either the full flat parameter vector
//! ([`ObjectiveProblem`]) or the random-effect block with fixed parameters
//! held constant ([`RandomEffectsProblem`]).
//!
//! Key behaviors
//! -------------
//! - Cost is the joint NLL itself. The solver minimizes it directly.
//! - Gradients are the analytic ones from [`SpaceTimeModel::gradient`],
//!   checked with [`validate_grad`] before they reach the solver.
//! - An infeasible evaluation (`value = +inf`) becomes
//!   `OptError::NonFiniteCost`; model errors become `OptError::Model`. Both
//!   are boxed into `argmin::core::Error` and recovered by
//!   `OptError::from` after the run.
use crate::{
    objective::SpaceTimeModel,
    optimization::{
        errors::OptResult,
        problem::{
            finite_diff::fd_gradient,
            types::{Cost, Grad, Theta},
            validation::{validate_grad, validate_value},
        },
    },
    spacetime::{effects::RandomEffects, params::SpaceTimeParams},
};
use argmin::core::{CostFunction, Error, Gradient};

/// `ObjectiveProblem` — the joint NLL over the full flat parameter vector.
#[derive(Debug, Clone, Copy)]
pub struct ObjectiveProblem<'a> {
    pub model: &'a SpaceTimeModel,
}

impl<'a> ObjectiveProblem<'a> {
    pub fn new(model: &'a SpaceTimeModel) -> Self {
        Self { model }
    }

    /// Joint NLL at `theta`, as an `OptResult`.
    pub fn value(&self, theta: &Theta) -> OptResult<Cost> {
        let eval = self.model.evaluate_flat(theta.view())?;
        validate_value(eval.value)?;
        Ok(eval.value)
    }

    /// Analytic gradient at `theta`.
    pub fn grad(&self, theta: &Theta) -> OptResult<Grad> {
        let g = self.model.gradient_flat(theta.view())?.to_flat();
        validate_grad(&g, theta.len())?;
        Ok(g)
    }

    /// Finite-difference gradient at `theta`, for derivative checks.
    pub fn fd_grad(&self, theta: &Theta) -> OptResult<Grad> {
        fd_gradient(theta, |x: &Theta| self.value(x))
    }
}

impl CostFunction for ObjectiveProblem<'_> {
    type Param = Theta;
    type Output = Cost;

    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        Ok(self.value(theta)?)
    }
}

impl Gradient for ObjectiveProblem<'_> {
    type Param = Theta;
    type Gradient = Grad;

    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        Ok(self.grad(theta)?)
    }
}

/// `RandomEffectsProblem` — the joint NLL over `[psi, omega]` with the fixed
/// parameters held at `params`.
///
/// This is the inner problem of a Laplace-type host: for given fixed
/// parameters, find the mode of the random effects.
#[derive(Debug, Clone, Copy)]
pub struct RandomEffectsProblem<'a> {
    pub model: &'a SpaceTimeModel,
    pub params: &'a SpaceTimeParams,
}

impl<'a> RandomEffectsProblem<'a> {
    pub fn new(model: &'a SpaceTimeModel, params: &'a SpaceTimeParams) -> Self {
        Self { model, params }
    }

    /// Length of the random-effect block.
    pub fn dim(&self) -> usize {
        self.model.layout().n_random()
    }

    fn effects(&self, theta: &Theta) -> OptResult<RandomEffects> {
        Ok(self.model.layout().split_random(theta.view())?)
    }

    pub fn value(&self, theta: &Theta) -> OptResult<Cost> {
        let effects = self.effects(theta)?;
        let eval = self.model.evaluate(self.params, &effects)?;
        validate_value(eval.value)?;
        Ok(eval.value)
    }

    pub fn grad(&self, theta: &Theta) -> OptResult<Grad> {
        let effects = self.effects(theta)?;
        let g = self.model.gradient(self.params, &effects)?.random_flat();
        validate_grad(&g, theta.len())?;
        Ok(g)
    }

    pub fn fd_grad(&self, theta: &Theta) -> OptResult<Grad> {
        fd_gradient(theta, |x: &Theta| self.value(x))
    }
}

impl CostFunction for RandomEffectsProblem<'_> {
    type Param = Theta;
    type Output = Cost;

    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        Ok(self.value(theta)?)
    }
}

impl Gradient for RandomEffectsProblem<'_> {
    type Param = Theta;
    type Gradient = Grad;

    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        Ok(self.grad(theta)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        network::FlowNetwork,
        objective::EvalOptions,
        optimization::errors::OptError,
        spacetime::data::{MISSING, SpaceTimeData},
    };
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Agreement of the analytic gradient with finite differences through
    //   both adapters.
    // - Error mapping for infeasible points and wrong vector lengths.
    // -------------------------------------------------------------------------

    fn model() -> SpaceTimeModel {
        let net = FlowNetwork::new(
            vec![0, 1],
            vec![2, 2],
            array![0.7, 1.3],
            array![2.0, 1.0, 3.0],
            vec![0, 1],
        )
        .unwrap();
        let data =
            SpaceTimeData::new(array![[0.3, -0.2], [0.8, MISSING], [0.5, 0.6]]).unwrap();
        SpaceTimeModel::new(net, data, EvalOptions::default()).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify the full-vector adapter against finite differences.
    //
    // Given
    // -----
    // - A three-node confluence with two time steps and one missing cell.
    //
    // Expect
    // ------
    // - Analytic and finite-difference gradients agree to 1e-5 absolute.
    fn objective_problem_gradient_matches_finite_differences() {
        let m = model();
        let problem = ObjectiveProblem::new(&m);
        let theta = array![
            0.1, -0.3, 0.2, 0.4, -0.1, // fixed
            0.05, -0.1, 0.2, // psi
            0.1, 0.0, -0.2, // omega[:,0]
            0.15, 0.05, -0.1 // omega[:,1]
        ];
        let analytic = problem.grad(&theta).unwrap();
        let numeric = problem.fd_grad(&theta).unwrap();
        for (a, n) in analytic.iter().zip(numeric.iter()) {
            assert_relative_eq!(*a, *n, epsilon = 1e-5);
        }
        assert_relative_eq!(
            problem.cost(&theta).unwrap(),
            m.evaluate_flat(theta.view()).unwrap().value,
            epsilon = 0.0
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify the random-effect adapter against finite differences.
    //
    // Expect
    // ------
    // - Gradient length is N + N*T = 9 and agrees with finite differences.
    fn random_effects_problem_gradient_matches_finite_differences() {
        let m = model();
        let params = SpaceTimeParams::new(-0.2, -0.5, 0.4, 0.1, 0.3);
        let problem = RandomEffectsProblem::new(&m, &params);
        let theta = array![0.1, 0.2, -0.1, 0.0, 0.3, 0.1, -0.2, 0.25, 0.05];
        assert_eq!(problem.dim(), 9);
        let analytic = problem.grad(&theta).unwrap();
        let numeric = problem.fd_grad(&theta).unwrap();
        for (a, n) in analytic.iter().zip(numeric.iter()) {
            assert_relative_eq!(*a, *n, epsilon = 1e-5);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify error mapping.
    //
    // Expect
    // ------
    // - log_theta = 1000 gives `NonFiniteCost` from `value` and a wrapped
    //   `Infeasible` model error from `grad`.
    // - A vector of the wrong length gives a wrapped `ParameterLengthMismatch`.
    fn adapters_map_model_errors() {
        let m = model();
        let problem = ObjectiveProblem::new(&m);
        let mut theta = Theta::zeros(m.layout().len());
        theta[0] = 1000.0;
        assert!(matches!(problem.value(&theta), Err(OptError::NonFiniteCost { .. })));
        assert!(matches!(problem.grad(&theta), Err(OptError::Model { .. })));

        let boxed = problem.cost(&theta).unwrap_err();
        assert!(matches!(OptError::from(boxed), OptError::NonFiniteCost { .. }));

        let short = Theta::zeros(3);
        assert!(matches!(problem.value(&short), Err(OptError::Model { .. })));
    }
}
