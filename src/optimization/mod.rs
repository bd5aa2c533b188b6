//! optimization — the numerical layer under the Rasch estimator.
//!
//! - [`loglik_optimizer`]: maximize a log-likelihood with L-BFGS.
//! - [`numerical_stability`]: overflow-free logistic and clipped Bernoulli
//!   log-probabilities.
//! - [`errors`]: [`OptError`](errors::OptError), shared by both.
//!
//! Nothing here logs except the optional `obs_slog` observer, and nothing
//! here knows about students or questions.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
