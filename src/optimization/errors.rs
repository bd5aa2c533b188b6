//! Optimizer-layer errors.
//!
//! One enum covers option validation, gradient and parameter checks, the
//! final-state checks on θ̂, and failures coming back from argmin. Errors a
//! model raises inside `value`/`grad` are boxed by argmin and recovered
//! intact by the `From<argmin::core::Error>` conversion.
use argmin::core::{ArgminError, Error};

/// Result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// The model has no analytic gradient; finite differences are used instead.
    GradientNotImplemented,
    GradientDimMismatch { expected: usize, found: usize },
    InvalidGradient { index: usize, value: f64, reason: &'static str },

    // ---- Options ----
    InvalidTolGrad { tol: f64, reason: &'static str },
    InvalidTolCost { tol: f64, reason: &'static str },
    InvalidMaxIter { max_iter: usize, reason: &'static str },
    /// Neither a gradient tolerance, a cost tolerance, nor an iteration cap was set.
    NoTolerancesProvided,
    InvalidLineSearch { name: String, reason: &'static str },
    InvalidLBFGSMem { mem: usize, reason: &'static str },

    // ---- Objective ----
    NonFiniteCost { value: f64 },

    // ---- Parameters ----
    /// θ̂ reported by the solver contains a non-finite entry.
    InvalidThetaHat { index: usize, value: f64, reason: &'static str },
    /// The solver finished without a best parameter.
    MissingThetaHat,
    ThetaLengthMismatch { expected: usize, actual: usize },
    InvalidThetaInput { index: usize, value: f64 },

    // ---- Backend ----
    /// A classified argmin error; `kind` names the `ArgminError` variant.
    Argmin { kind: &'static str, text: String },
    /// Any other error surfaced by the backend.
    BackendError { text: String },
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptError::GradientNotImplemented => write!(f, "Analytic gradient not implemented"),
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient length {found} does not match parameter length {expected}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Gradient entry {index} is {value}: {reason}")
            }
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid iteration cap {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => write!(f, "No stopping criterion provided"),
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Unknown line search '{name}': {reason}")
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }
            OptError::NonFiniteCost { value } => write!(f, "Objective evaluated to {value}"),
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Estimated parameter {index} is {value}: {reason}")
            }
            OptError::MissingThetaHat => write!(f, "Optimizer returned no parameter estimate"),
            OptError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Parameter vector has length {actual}, expected {expected}")
            }
            OptError::InvalidThetaInput { index, value } => {
                write!(f, "Parameter {index} is {value}; all entries must be finite")
            }
            OptError::Argmin { kind, text } => write!(f, "argmin {kind}: {text}"),
            OptError::BackendError { text } => write!(f, "Optimizer backend error: {text}"),
        }
    }
}

impl From<Error> for OptError {
    fn from(err: Error) -> Self {
        let err = match err.downcast::<OptError>() {
            Ok(own) => return own,
            Err(err) => err,
        };
        let (kind, text) = match err.downcast::<ArgminError>() {
            Ok(ArgminError::InvalidParameter { text }) => ("invalid parameter", text),
            Ok(ArgminError::NotImplemented { text }) => ("not implemented", text),
            Ok(ArgminError::NotInitialized { text }) => ("not initialized", text),
            Ok(ArgminError::ConditionViolated { text }) => ("condition violated", text),
            Ok(ArgminError::CheckpointNotFound { text }) => ("checkpoint not found", text),
            Ok(ArgminError::PotentialBug { text }) => ("potential bug", text),
            Ok(ArgminError::ImpossibleError { text }) => ("impossible error", text),
            Ok(other) => return OptError::BackendError { text: other.to_string() },
            Err(err) => return OptError::BackendError { text: err.to_string() },
        };
        OptError::Argmin { kind, text }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // A model-level `OptError` boxed into an argmin `Error` must come back
    // unchanged rather than being flattened into `BackendError`.
    fn from_argmin_error_recovers_boxed_opt_error() {
        // Arrange
        let boxed: Error = OptError::NonFiniteCost { value: f64::INFINITY }.into();

        // Act
        let recovered = OptError::from(boxed);

        // Assert
        assert_eq!(recovered, OptError::NonFiniteCost { value: f64::INFINITY });
    }

    #[test]
    // Purpose
    // -------
    // Argmin's own error kinds are classified by variant.
    fn from_argmin_error_classifies_argmin_variants() {
        let boxed: Error = ArgminError::InvalidParameter { text: "tol".to_string() }.into();

        let mapped = OptError::from(boxed);

        assert_eq!(
            mapped,
            OptError::Argmin { kind: "invalid parameter", text: "tol".to_string() }
        );
        assert_eq!(mapped.to_string(), "argmin invalid parameter: tol");
    }
}
