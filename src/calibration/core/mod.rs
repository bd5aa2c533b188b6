//! core — shared calibration data, options, policies, and artifacts.
//!
//! Purpose
//! -------
//! Collect the building blocks both estimators share: the response dataset,
//! the configuration surface, the method-selection policy, min-max
//! normalization, the fixed difficulty categories, the output records, and
//! a synthetic data generator.
//!
//! Key behaviors
//! -------------
//! - [`ResponseDataset`] indexes observations by first occurrence and
//!   rejects empty or zero-response inputs.
//! - [`select_methods`] maps responses-per-question and a
//!   [`MethodPreference`] to the estimators to run.
//! - [`normalize_difficulties`] rescales raw difficulties to `[0, 1]` or
//!   flags a degenerate range.
//! - [`DifficultyCategory::from_normalized`] applies the fixed 0.3 / 0.7
//!   thresholds.
//!
//! Conventions
//! -----------
//! - Indices are 0-based and stable for a given observation order.
//! - This module avoids I/O and logging; warnings are returned as values.

pub mod category;
pub mod data;
pub mod estimate;
pub mod normalize;
pub mod options;
pub mod selector;
pub mod simulate;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::category::{DifficultyCategory, HARD_THRESHOLD, MEDIUM_THRESHOLD};
pub use self::data::{IndexMap, Observation, ResponseDataset};
pub use self::estimate::{
    AbilityEstimate, CategoryDistribution, DatasetSummary, DifficultyEstimate,
    build_difficulty_estimates,
};
pub use self::normalize::{Normalized, SIMPLE_MIN_RANGE, normalize_difficulties};
pub use self::options::{CalibrationOptions, DensityPolicy, MethodPreference, RaschOptions};
pub use self::selector::{DensityBand, EstimationMethod, MethodSelection, select_methods};
pub use self::simulate::{SimulatedResponses, simulate_rasch_responses};
