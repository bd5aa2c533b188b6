//! Checks shared by the optimizer: option values, parameter vectors,
//! gradients, and the solver's final state.
//!
//! Every check reports the first offending entry through a dedicated
//! [`OptError`] variant, so callers never have to re-scan a vector to find
//! what went wrong.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{Grad, Theta},
};

/// Reason attached to a rejected tolerance, or `None` if `tol` is usable.
fn tolerance_problem(tol: Option<f64>) -> Option<(f64, &'static str)> {
    match tol {
        Some(t) if !t.is_finite() => Some((t, "Tolerance must be finite.")),
        Some(t) if t <= 0.0 => Some((t, "Tolerance must be positive.")),
        _ => None,
    }
}

/// `None` or a finite, strictly positive gradient-norm tolerance.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    match tolerance_problem(tol) {
        Some((tol, reason)) => Err(OptError::InvalidTolGrad { tol, reason }),
        None => Ok(()),
    }
}

/// `None` or a finite, strictly positive cost-change tolerance.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    match tolerance_problem(tol) {
        Some((tol, reason)) => Err(OptError::InvalidTolCost { tol, reason }),
        None => Ok(()),
    }
}

fn first_non_finite(values: &ndarray::Array1<f64>) -> Option<(usize, f64)> {
    values.iter().copied().enumerate().find(|(_, v)| !v.is_finite())
}

/// Length first, then finiteness, for a starting vector.
///
/// # Errors
/// - [`OptError::ThetaLengthMismatch`] if `theta.len() != expected`.
/// - [`OptError::InvalidThetaInput`] for the first NaN/±∞ entry.
pub fn validate_theta(theta: &Theta, expected: usize) -> OptResult<()> {
    if theta.len() != expected {
        return Err(OptError::ThetaLengthMismatch { expected, actual: theta.len() });
    }
    match first_non_finite(theta) {
        Some((index, value)) => Err(OptError::InvalidThetaInput { index, value }),
        None => Ok(()),
    }
}

/// Length first, then finiteness, for a gradient.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if `grad.len() != dim`.
/// - [`OptError::InvalidGradient`] for the first NaN/±∞ entry.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    match first_non_finite(grad) {
        Some((index, value)) => Err(OptError::InvalidGradient {
            index,
            value,
            reason: "Gradient elements must be finite.",
        }),
        None => Ok(()),
    }
}

/// Unwrap the solver's best parameter, rejecting absent or non-finite ones.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    let theta_hat = theta_hat.ok_or(OptError::MissingThetaHat)?;
    match first_non_finite(&theta_hat) {
        Some((index, value)) => Err(OptError::InvalidThetaHat {
            index,
            value,
            reason: "Parameter estimates must be finite.",
        }),
        None => Ok(theta_hat),
    }
}

/// ℓ(θ̂) must be finite; any sign is fine.
pub fn validate_value(value: f64) -> OptResult<()> {
    if value.is_finite() { Ok(()) } else { Err(OptError::NonFiniteCost { value }) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn verify_tolerances_reject_non_positive_and_non_finite() {
        assert!(verify_tol_grad(None).is_ok());
        assert!(verify_tol_grad(Some(1e-5)).is_ok());
        assert!(matches!(verify_tol_grad(Some(0.0)), Err(OptError::InvalidTolGrad { .. })));
        assert!(matches!(verify_tol_cost(Some(f64::NAN)), Err(OptError::InvalidTolCost { .. })));
        assert!(matches!(verify_tol_cost(Some(-1.0)), Err(OptError::InvalidTolCost { .. })));
    }

    #[test]
    // Purpose
    // -------
    // `validate_theta` reports length mismatches before finiteness and
    // points at the first non-finite entry.
    fn validate_theta_reports_length_then_first_non_finite_entry() {
        let theta = array![0.1, f64::NAN, f64::INFINITY];

        assert_eq!(
            validate_theta(&theta, 4),
            Err(OptError::ThetaLengthMismatch { expected: 4, actual: 3 })
        );
        match validate_theta(&theta, 3) {
            Err(OptError::InvalidThetaInput { index, value }) => {
                assert_eq!(index, 1);
                assert!(value.is_nan());
            }
            other => panic!("Expected InvalidThetaInput, got {other:?}"),
        }
    }

    #[test]
    fn validate_grad_checks_dimension_and_finiteness() {
        let grad = array![1.0, 2.0];
        assert!(validate_grad(&grad, 2).is_ok());
        assert_eq!(
            validate_grad(&grad, 3),
            Err(OptError::GradientDimMismatch { expected: 3, found: 2 })
        );
        let bad = array![1.0, f64::NEG_INFINITY];
        assert!(matches!(validate_grad(&bad, 2), Err(OptError::InvalidGradient { index: 1, .. })));
    }

    #[test]
    fn validate_theta_hat_requires_present_finite_vector() {
        assert_eq!(validate_theta_hat(None), Err(OptError::MissingThetaHat));
        assert!(validate_theta_hat(Some(array![0.0, -1.5])).is_ok());
        assert!(matches!(
            validate_theta_hat(Some(array![f64::NAN])),
            Err(OptError::InvalidThetaHat { index: 0, .. })
        ));
        assert!(validate_value(-12.5).is_ok());
        assert!(validate_value(f64::NAN).is_err());
    }
}
