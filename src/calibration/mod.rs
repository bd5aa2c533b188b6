//! calibration — item difficulty estimation from graded responses.
//!
//! Purpose
//! -------
//! Estimate a per-question difficulty from `(student, question, correct)`
//! observations, rescale it to `[0, 1]`, and bucket it into Easy, Medium,
//! or Hard. Two estimators are available: the correct-rate (Simple)
//! estimator for sparse data, and a joint maximum-likelihood Rasch (1PL)
//! estimator for denser data.
//!
//! Key behaviors
//! -------------
//! - [`core`] holds the dataset, options, selection policy, normalizer,
//!   categories, output records, and a synthetic data generator.
//! - [`models`] holds the two estimators.
//! - [`calibrate`](calibrate::calibrate) runs the selected estimators and
//!   returns one [`CalibrationReport`] per method.
//! - [`errors`] separates fatal [`CalibrationError`]s from
//!   [`CalibrationWarning`]s attached to reports.
//!
//! Invariants & assumptions
//! ------------------------
//! - Normalized difficulties lie in `[0, 1]`; `0.5` everywhere means the raw
//!   range was degenerate and a `LowVariation` warning is attached.
//! - Category thresholds are fixed at 0.3 and 0.7.
//!
//! Conventions
//! -----------
//! - Only [`calibrate`](calibrate::calibrate) logs; lower layers return
//!   warnings as values.
//! - Randomness enters only through an injected `Rng` or an explicit seed.

pub mod calibrate;
pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::calibrate::{
    CalibrationOutcome, CalibrationReport, RaschDiagnostics, calibrate, calibrate_observations,
    calibrate_with_rng,
};
pub use self::core::{
    CalibrationOptions, DifficultyCategory, DifficultyEstimate, EstimationMethod,
    MethodPreference, Observation, ResponseDataset,
};
pub use self::errors::{CalibrationError, CalibrationResult, CalibrationWarning};

pub mod prelude {
    pub use super::calibrate::{CalibrationOutcome, CalibrationReport, calibrate};
    pub use super::core::{CalibrationOptions, MethodPreference, Observation, ResponseDataset};
    pub use super::errors::{CalibrationError, CalibrationWarning};
}
