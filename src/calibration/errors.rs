//! Errors and warnings for item calibration (dataset validation, option
//! checks, normalization, and optimizer failures).
//!
//! This module defines the fatal error type, [`CalibrationError`], and the
//! non-fatal [`CalibrationWarning`] attached to calibration reports. Both
//! implement `Display`; the error also implements `Error` and converts to
//! `PyErr` when the `python-bindings` feature is enabled.
//!
//! ## Taxonomy
//! - *Insufficient data*: empty dataset, or a declared question/student with
//!   zero observations. See [`CalibrationError::is_insufficient_data`].
//! - *Estimation error*: numerical corruption from the objective or the
//!   normalizer. See [`CalibrationError::is_estimation_error`].
//! - Warnings never abort a run; they travel with the produced estimates.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::optimization::errors::OptError;

/// Result alias for calibration operations that may produce [`CalibrationError`].
pub type CalibrationResult<T> = Result<T, CalibrationError>;

/// Unified fatal error type for item calibration.
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationError {
    // ---- Insufficient data ----
    /// No observations were supplied.
    EmptyDataset,

    /// A declared question never appears in the observations.
    QuestionWithoutResponses { question_key: String },

    /// A declared student never appears in the observations.
    StudentWithoutResponses { student_key: String },

    // ---- Estimation ----
    /// A raw difficulty handed to the normalizer is NaN/±inf.
    NonFiniteDifficulty { index: usize, value: f64 },

    /// The optimizer failed on malformed numerical input or a backend error.
    EstimationFailed { reason: OptError },

    // ---- Options ----
    /// A configuration value is out of range or unparsable.
    InvalidOption { name: &'static str, value: String, reason: &'static str },
}

impl CalibrationError {
    /// `true` for the empty-dataset and zero-response variants.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(
            self,
            CalibrationError::EmptyDataset
                | CalibrationError::QuestionWithoutResponses { .. }
                | CalibrationError::StudentWithoutResponses { .. }
        )
    }

    /// `true` for numerical failures raised during estimation.
    pub fn is_estimation_error(&self) -> bool {
        matches!(
            self,
            CalibrationError::NonFiniteDifficulty { .. } | CalibrationError::EstimationFailed { .. }
        )
    }
}

impl std::error::Error for CalibrationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CalibrationError::EstimationFailed { reason } => Some(reason),
            _ => None,
        }
    }
}

impl std::fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Insufficient data ----
            CalibrationError::EmptyDataset => {
                write!(f, "Insufficient data: the response dataset is empty.")
            }
            CalibrationError::QuestionWithoutResponses { question_key } => {
                write!(f, "Insufficient data: question '{question_key}' has no responses.")
            }
            CalibrationError::StudentWithoutResponses { student_key } => {
                write!(f, "Insufficient data: student '{student_key}' has no responses.")
            }

            // ---- Estimation ----
            CalibrationError::NonFiniteDifficulty { index, value } => {
                write!(f, "Estimation error: raw difficulty at index {index} is non-finite: {value}")
            }
            CalibrationError::EstimationFailed { reason } => {
                write!(f, "Estimation error: optimizer failed: {reason}")
            }

            // ---- Options ----
            CalibrationError::InvalidOption { name, value, reason } => {
                write!(f, "Invalid option {name} = {value}: {reason}")
            }
        }
    }
}

impl From<OptError> for CalibrationError {
    fn from(err: OptError) -> CalibrationError {
        CalibrationError::EstimationFailed { reason: err }
    }
}

/// Convert a [`CalibrationError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<CalibrationError> for PyErr {
    fn from(err: CalibrationError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Non-fatal conditions attached to a calibration report.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalibrationWarning {
    /// Raw difficulties span less than the minimum range; every item was
    /// assigned the constant normalized difficulty 0.5.
    LowVariation { range: f64, threshold: f64 },

    /// The optimizer stopped without meeting its convergence criterion.
    Convergence { status: String, iterations: usize },

    /// The sparsest item has fewer responses than recommended for Rasch.
    SparseItems { question_key: String, responses: usize, recommended: usize },

    /// Rasch was requested although the density is in the sparse band.
    RaschBelowDensity { responses_per_question: f64, threshold: f64 },

    /// Every observation has the same outcome; the Rasch optimum does not exist.
    NoResponseVariation { correct_rate: f64 },
}

impl std::fmt::Display for CalibrationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalibrationWarning::LowVariation { range, threshold } => write!(
                f,
                "Low variation: raw difficulty range {range:.6} does not exceed {threshold}; \
                 all items set to 0.5."
            ),
            CalibrationWarning::Convergence { status, iterations } => write!(
                f,
                "Optimizer did not converge after {iterations} iterations ({status}); \
                 estimates are best-effort."
            ),
            CalibrationWarning::SparseItems { question_key, responses, recommended } => write!(
                f,
                "Question '{question_key}' has only {responses} responses; \
                 at least {recommended} are recommended for Rasch calibration."
            ),
            CalibrationWarning::RaschBelowDensity { responses_per_question, threshold } => write!(
                f,
                "Rasch requested at {responses_per_question:.1} responses per question, \
                 below the reliability threshold of {threshold}."
            ),
            CalibrationWarning::NoResponseVariation { correct_rate } => write!(
                f,
                "All responses share the same outcome (correct rate {correct_rate}); \
                 Rasch optimization skipped."
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // The classifiers split errors into the insufficient-data and estimation
    // families without overlap.
    fn classifiers_partition_error_taxonomy() {
        let missing = CalibrationError::QuestionWithoutResponses { question_key: "Q5".into() };
        let failed = CalibrationError::from(OptError::MissingThetaHat);
        let option = CalibrationError::InvalidOption {
            name: "restarts",
            value: "0".into(),
            reason: "must be at least 1",
        };

        assert!(CalibrationError::EmptyDataset.is_insufficient_data());
        assert!(missing.is_insufficient_data() && !missing.is_estimation_error());
        assert!(failed.is_estimation_error() && !failed.is_insufficient_data());
        assert!(!option.is_insufficient_data() && !option.is_estimation_error());
    }

    #[test]
    fn display_names_the_offending_key_and_optimizer_reason() {
        let missing = CalibrationError::StudentWithoutResponses { student_key: "S010".into() };
        assert!(missing.to_string().contains("S010"));

        let failed = CalibrationError::from(OptError::NonFiniteCost { value: f64::NAN });
        assert!(failed.to_string().starts_with("Estimation error"));
        assert!(std::error::Error::source(&failed).is_some());
    }
}
