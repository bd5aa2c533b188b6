//! The one public entry point of the optimizer.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::CostAdapter,
        builders::build_lbfgs,
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
        types::{HagerZhangLS, MoreThuenteLS},
    },
};

/// Maximize `model`'s log-likelihood over `data`, starting at `theta0`.
///
/// `model.check` vets the starting point first; nothing is evaluated if it
/// fails. L-BFGS then minimizes `−ℓ` with the line search named in `opts`.
/// Running out of iterations is not an error: the outcome comes back with
/// `converged == false`.
///
/// # Errors
/// - Whatever `model.check` rejects.
/// - Tolerances argmin refuses.
/// - Errors from `value`/`grad` during the run, unchanged.
/// - A missing or non-finite θ̂ at the end.
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use item_calibration::optimization::errors::OptResult;
/// use item_calibration::optimization::loglik_optimizer::{
///     maximize, LogLikelihood, MLEOptions, Theta,
/// };
///
/// struct Peak;
/// impl LogLikelihood for Peak {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let fit = maximize(&Peak, array![0.4, -1.0], &(), &MLEOptions::default())?;
/// assert!(fit.value <= 0.0);
/// # Ok::<(), item_calibration::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    model: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    model.check(&theta0, data)?;
    let problem = CostAdapter::new(model, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            run_lbfgs(theta0, opts, problem, build_lbfgs(MoreThuenteLS::new(), opts)?)
        }
        LineSearcher::HagerZhang => {
            run_lbfgs(theta0, opts, problem, build_lbfgs(HagerZhangLS::new(), opts)?)
        }
    }
}
