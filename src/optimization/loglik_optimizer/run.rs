//! Solver execution: one `Executor` run per optimization, converted into an
//! [`OptimOutcome`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, LogLikelihood, MLEOptions, OptimOutcome, Theta, adapter::CostAdapter,
    },
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient};
use argmin::core::{Executor, State};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;

/// Drive `solver` on `problem` from `theta0` and package the final state.
///
/// Both line-search builders funnel through here. The iteration cap comes
/// from `opts.tols.max_iter`; when it is `None` argmin's own limit applies.
///
/// With the `obs_slog` feature and `opts.verbose`, a non-blocking terminal
/// observer is attached for every iteration and ℓ(θ₀) plus ‖∇ℓ(θ₀)‖ are
/// emitted once as a `tracing` debug event.
///
/// The reported value is ℓ at argmin's best parameter, i.e. the negated best
/// cost, and `iterations` counts solver iterations rather than function
/// evaluations (those are in `fn_evals`).
///
/// # Errors
/// - Any argmin runtime failure, routed through `From<argmin::core::Error>`
///   for [`OptError`](crate::optimization::errors::OptError), so an error
///   raised inside the model's `value`/`grad` comes back as itself.
/// - `OptError::MissingThetaHat` / `InvalidThetaHat` when the final state
///   holds no usable parameter.
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: CostAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: argmin::core::Solver<
            CostAdapter<'a, F>,
            argmin::core::IterState<Theta, Grad, (), (), (), f64>,
        > + Send
        + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut state = optimizer.run()?.state().clone();
    let best_loglik = -state.get_best_cost();
    let termination = state.get_termination_status().clone();
    OptimOutcome::new(
        state.take_best_param(),
        best_loglik,
        termination,
        state.get_iter(),
        state.get_func_counts().clone(),
        state.take_gradient(),
    )
}

#[cfg(feature = "obs_slog")]
fn log_initial_state<F>(theta0: &Theta, problem: &CostAdapter<'_, F>) -> OptResult<()>
where
    F: LogLikelihood,
{
    let ll0 = -problem.cost(theta0)?;
    let g0n = problem.gradient(theta0).ok().map(|g| g.l2_norm());
    tracing::debug!(loglik = ll0, grad_norm = ?g0n, dim = theta0.len(), "initial optimizer state");
    Ok(())
}
