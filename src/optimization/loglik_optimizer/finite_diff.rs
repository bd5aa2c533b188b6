//! Finite-difference gradients for models without an analytic `grad`.
//!
//! `finitediff` wants an `f64`-valued closure, so a failing cost is turned
//! into `NaN` and its error parked in a cell. The first parked error wins
//! and is returned once the differencing pass is over.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{Grad, Theta, validation::validate_grad},
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Gradient of `cost` at `theta`.
///
/// Central differences are tried first. If the cost failed anywhere on the
/// stencil, or the result is not finite, one forward-difference pass is
/// made and its outcome is final.
///
/// # Errors
/// - The first error `cost` returned during the forward pass.
/// - `InvalidGradient` when the forward gradient is still non-finite.
pub fn fd_gradient<G>(theta: &Theta, cost: G) -> OptResult<Grad>
where
    G: Fn(&Theta) -> Result<f64, Error>,
{
    let failure: RefCell<Option<Error>> = RefCell::new(None);
    let probe = |t: &Theta| -> f64 {
        match cost(t) {
            Ok(c) => c,
            Err(e) => {
                failure.borrow_mut().get_or_insert(e);
                f64::NAN
            }
        }
    };

    let central = theta.central_diff(&probe);
    if failure.borrow().is_none() && validate_grad(&central, theta.len()).is_ok() {
        return Ok(central);
    }

    failure.replace(None);
    let forward = theta.forward_diff(&probe);
    if let Some(err) = failure.take() {
        return Err(err.into());
    }
    validate_grad(&forward, theta.len())?;
    Ok(forward)
}
