//! problem::finite_diff — finite-difference gradients with error capture.
//!
//! Purpose
//! -------
//! Approximate the gradient of a fallible scalar objective without depending
//! on the `finitediff` API elsewhere. Used to cross-check the analytic
//! gradient of the space-time objective and by hosts that want a
//! derivative-free reference.
//!
//! Key behaviors
//! -------------
//! - [`fd_gradient`] tries central differences first and falls back to
//!   forward differences when the central estimate fails validation.
//! - Errors raised by the objective inside the finite-difference closure are
//!   captured in a `RefCell` slot and returned as the first error seen,
//!   instead of being silently turned into NaN gradients.
//!
//! Invariants & assumptions
//! ------------------------
//! - A returned gradient always passes [`validate_grad`].
use crate::optimization::{
    errors::{OptError, OptResult},
    problem::{
        types::{Grad, Theta},
        validation::validate_grad,
    },
};
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Finite-difference gradient of `func` at `theta`.
///
/// Errors
/// ------
/// - The first `OptError` raised by `func` during differencing.
/// - `OptError::InvalidGradient` when neither the central nor the forward
///   estimate is finite.
pub fn fd_gradient<F>(theta: &Theta, func: F) -> OptResult<Grad>
where
    F: Fn(&Theta) -> OptResult<f64>,
{
    let closure_err: RefCell<Option<OptError>> = RefCell::new(None);
    let wrapped = |x: &Theta| -> f64 {
        match func(x) {
            Ok(value) => value,
            Err(err) => {
                let mut slot = closure_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(err);
                }
                f64::NAN
            }
        }
    };

    let central = theta.central_diff(&wrapped);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    if validate_grad(&central, theta.len()).is_ok() {
        return Ok(central);
    }
    run_forward_diff(theta, &wrapped, &closure_err)
}

fn run_forward_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<OptError>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}
