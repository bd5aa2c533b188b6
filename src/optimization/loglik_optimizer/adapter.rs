//! `LogLikelihood` → argmin problem.
//!
//! argmin minimizes, so the adapter hands it `c(θ) = −ℓ(θ)` and `−∇ℓ(θ)`.
//! When the model has no analytic gradient the cost itself is
//! differenced, which already carries the right sign.
use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        finite_diff::fd_gradient,
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};

/// A model and its data, viewed as a cost to minimize.
#[derive(Debug, Clone)]
pub struct CostAdapter<'a, F: LogLikelihood> {
    model: &'a F,
    data: &'a F::Data,
}

impl<'a, F: LogLikelihood> CostAdapter<'a, F> {
    pub fn new(model: &'a F, data: &'a F::Data) -> Self {
        Self { model, data }
    }
}

impl<F: LogLikelihood> CostFunction for CostAdapter<'_, F> {
    type Param = Theta;
    type Output = Cost;

    /// # Errors
    /// Model errors pass through unchanged; a non-finite ℓ becomes
    /// `NonFiniteCost`.
    fn cost(&self, theta: &Theta) -> Result<Cost, Error> {
        let loglik = self.model.value(theta, self.data)?;
        if !loglik.is_finite() {
            return Err(OptError::NonFiniteCost { value: loglik }.into());
        }
        Ok(-loglik)
    }
}

impl<F: LogLikelihood> Gradient for CostAdapter<'_, F> {
    type Param = Theta;
    type Gradient = Grad;

    fn gradient(&self, theta: &Theta) -> Result<Grad, Error> {
        let score = match self.model.grad(theta, self.data) {
            Err(OptError::GradientNotImplemented) => {
                return Ok(fd_gradient(theta, |t| self.cost(t))?);
            }
            other => other?,
        };
        validate_grad(&score, theta.len())?;
        Ok(-score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use ndarray::array;

    // ℓ(θ) = −Σ (θᵢ − 1)², maximized at θ = 1.
    struct Bowl {
        analytic: bool,
    }

    impl LogLikelihood for Bowl {
        type Data = ();

        fn value(&self, theta: &Theta, _: &()) -> OptResult<Cost> {
            Ok(-theta.mapv(|t| (t - 1.0).powi(2)).sum())
        }

        fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
            Ok(())
        }

        fn grad(&self, theta: &Theta, _: &()) -> OptResult<Grad> {
            if !self.analytic {
                return Err(OptError::GradientNotImplemented);
            }
            Ok(theta.mapv(|t| 2.0 * (1.0 - t)))
        }
    }

    struct Broken;

    impl LogLikelihood for Broken {
        type Data = ();

        fn value(&self, _: &Theta, _: &()) -> OptResult<Cost> {
            Ok(f64::NEG_INFINITY)
        }

        fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // Cost is −ℓ and the analytic gradient is −∇ℓ.
    fn cost_and_analytic_gradient_are_negated() {
        // Arrange
        let model = Bowl { analytic: true };
        let problem = CostAdapter::new(&model, &());
        let theta = array![2.0, 0.0];

        // Act
        let cost = problem.cost(&theta).unwrap();
        let grad = problem.gradient(&theta).unwrap();

        // Assert
        assert_eq!(cost, 2.0);
        assert_eq!(grad, array![2.0, -2.0]);
    }

    #[test]
    // Purpose
    // -------
    // Without an analytic gradient the differenced cost gives the same
    // answer.
    fn missing_gradient_uses_finite_differences() {
        let model = Bowl { analytic: false };
        let problem = CostAdapter::new(&model, &());

        let grad = problem.gradient(&array![2.0, 0.0]).unwrap();

        assert!((grad[0] - 2.0).abs() < 1e-6);
        assert!((grad[1] + 2.0).abs() < 1e-6);
    }

    #[test]
    fn non_finite_loglik_is_rejected() {
        let problem = CostAdapter::new(&Broken, &());

        let err = OptError::from(problem.cost(&array![0.0]).unwrap_err());

        assert_eq!(err, OptError::NonFiniteCost { value: f64::NEG_INFINITY });
    }
}
