//! L-BFGS construction.
//!
//! The solver is generic over its line search, so one builder serves both
//! `LineSearcher` variants. Starting point and iteration cap belong to the
//! executor and are set in [`run_lbfgs`](super::run::run_lbfgs).
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{DEFAULT_LBFGS_MEM, Lbfgs},
    },
};

/// L-BFGS with `line_search`, history `opts.lbfgs_mem` and the gradient /
/// cost tolerances from `opts.tols`. Unset tolerances keep argmin's own
/// defaults.
///
/// # Errors
/// A tolerance argmin refuses, reported as `OptError::Argmin`.
pub fn build_lbfgs<L>(line_search: L, opts: &MLEOptions) -> OptResult<Lbfgs<L>> {
    let mut solver = Lbfgs::new(line_search, opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM));
    if let Some(tol) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(tol)?;
    }
    if let Some(tol) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(tol)?;
    }
    Ok(solver)
}
