//! Log-likelihood maximization on top of argmin's L-BFGS.
//!
//! A model implements [`LogLikelihood`] (ℓ, an optional ∇ℓ, and a `check`
//! on the starting point) and calls [`maximize`]. Inside, the model is wrapped
//! as a cost `−ℓ` ([`adapter`]), the solver is assembled for the requested
//! line search ([`builders`]), run by an argmin `Executor` ([`run`]), and the
//! final state is validated into an [`OptimOutcome`]. Gradients fall back to
//! finite differences ([`finite_diff`]) when the model has none.
//!
//! Hitting `max_iter` is reported through `OptimOutcome::converged`, never as
//! an error. The Rasch estimator in `calibration::models::rasch` is the
//! in-crate caller; it runs one `maximize` per start.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
