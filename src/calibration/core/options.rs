//! Calibration options — the configuration surface of the estimation core.
//!
//! Purpose
//! -------
//! Collect every knob a calibration run consumes in one explicit value that
//! is passed into the estimators, rather than module-level state. This
//! includes the method preference, the Rasch optimizer settings, the density
//! bands of the method selector, and the optional random seed.
//!
//! Key behaviors
//! -------------
//! - [`RaschOptions`] bundles [`MLEOptions`] with restart count,
//!   initialization scale, the degeneracy threshold of the normalizer, and
//!   whether abilities are centered after fitting.
//! - [`DensityPolicy`] holds the responses-per-question bands of the method
//!   selector.
//! - [`MethodPreference`] is the caller's explicit choice, parsed from text.
//! - [`CalibrationOptions`] ties them together with `random_seed` and the
//!   recommended per-item response count.
//!
//! Invariants & assumptions
//! ------------------------
//! - Constructors validate ranges and never panic; `Default` values are
//!   always valid.
//! - Difficulty category thresholds are fixed constants
//!   ([`crate::calibration::core::category`]) and deliberately absent here.
use crate::{
    calibration::errors::{CalibrationError, CalibrationResult},
    optimization::loglik_optimizer::MLEOptions,
};
use std::str::FromStr;

/// Default number of random starts for the Rasch estimator.
pub const DEFAULT_RESTARTS: usize = 1;

/// Standard deviation of the zero-mean normal used to initialize θ.
pub const DEFAULT_INIT_SCALE: f64 = 0.1;

/// Minimum raw-logit range below which Rasch difficulties are degenerate.
pub const DEFAULT_MIN_DIFFICULTY_RANGE: f64 = 0.01;

/// Below this many responses per question only the correct-rate path is reliable.
pub const DEFAULT_SPARSE_BELOW: f64 = 30.0;

/// Above this many responses per question Rasch is preferred.
pub const DEFAULT_DENSE_ABOVE: f64 = 100.0;

/// Per-item response count recommended for Rasch calibration.
pub const DEFAULT_MIN_RECOMMENDED_RESPONSES: usize = 50;

/// Estimation-time configuration for the Rasch estimator.
///
/// Fields
/// ------
/// - `mle_opts`: [`MLEOptions`]
///   L-BFGS configuration. The default is `tol_grad = 1e-5`,
///   `max_iter = 1000`, More–Thuente line search, memory 7.
/// - `restarts`: `usize`
///   Independent random starts; the lowest negative log-likelihood wins.
/// - `init_scale`: `f64`
///   Standard deviation of the N(0, s²) draws used for the initial θ.
/// - `min_difficulty_range`: `f64`
///   Degeneracy threshold handed to the normalizer.
/// - `center_abilities`: `bool`
///   Shift abilities and difficulties so that mean ability is 0. This is a
///   pure relabeling along the model's flat direction; normalized
///   difficulties do not change.
#[derive(Debug, Clone, PartialEq)]
pub struct RaschOptions {
    pub mle_opts: MLEOptions,
    pub restarts: usize,
    pub init_scale: f64,
    pub min_difficulty_range: f64,
    pub center_abilities: bool,
}

impl RaschOptions {
    /// Construct validated Rasch options.
    ///
    /// Errors
    /// ------
    /// - `CalibrationError::InvalidOption` when `restarts == 0`, when
    ///   `init_scale` is not finite and positive, or when
    ///   `min_difficulty_range` is not finite and non-negative.
    pub fn new(
        mle_opts: MLEOptions, restarts: usize, init_scale: f64, min_difficulty_range: f64,
        center_abilities: bool,
    ) -> CalibrationResult<Self> {
        if restarts == 0 {
            return Err(CalibrationError::InvalidOption {
                name: "restarts",
                value: restarts.to_string(),
                reason: "at least one start is required",
            });
        }
        if !init_scale.is_finite() || init_scale <= 0.0 {
            return Err(CalibrationError::InvalidOption {
                name: "init_scale",
                value: init_scale.to_string(),
                reason: "must be finite and positive",
            });
        }
        if !min_difficulty_range.is_finite() || min_difficulty_range < 0.0 {
            return Err(CalibrationError::InvalidOption {
                name: "min_difficulty_range",
                value: min_difficulty_range.to_string(),
                reason: "must be finite and non-negative",
            });
        }
        Ok(RaschOptions { mle_opts, restarts, init_scale, min_difficulty_range, center_abilities })
    }
}

impl Default for RaschOptions {
    fn default() -> Self {
        RaschOptions {
            mle_opts: MLEOptions::default(),
            restarts: DEFAULT_RESTARTS,
            init_scale: DEFAULT_INIT_SCALE,
            min_difficulty_range: DEFAULT_MIN_DIFFICULTY_RANGE,
            center_abilities: true,
        }
    }
}

/// Responses-per-question bands used by the method selector.
///
/// `rpq < sparse_below` is sparse, `rpq > dense_above` is dense, and
/// everything in between (inclusive) is moderate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityPolicy {
    pub sparse_below: f64,
    pub dense_above: f64,
}

impl DensityPolicy {
    /// Errors
    /// ------
    /// - `CalibrationError::InvalidOption` unless
    ///   `0 ≤ sparse_below ≤ dense_above` and both are finite.
    pub fn new(sparse_below: f64, dense_above: f64) -> CalibrationResult<Self> {
        if !sparse_below.is_finite() || sparse_below < 0.0 {
            return Err(CalibrationError::InvalidOption {
                name: "sparse_below",
                value: sparse_below.to_string(),
                reason: "must be finite and non-negative",
            });
        }
        if !dense_above.is_finite() || dense_above < sparse_below {
            return Err(CalibrationError::InvalidOption {
                name: "dense_above",
                value: dense_above.to_string(),
                reason: "must be finite and at least sparse_below",
            });
        }
        Ok(DensityPolicy { sparse_below, dense_above })
    }
}

impl Default for DensityPolicy {
    fn default() -> Self {
        DensityPolicy { sparse_below: DEFAULT_SPARSE_BELOW, dense_above: DEFAULT_DENSE_ABOVE }
    }
}

/// Caller's estimator preference.
///
/// Parsing is case-insensitive: `auto`, `simple`, `rasch` (alias `irt`), `both`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodPreference {
    /// Let the density bands decide.
    #[default]
    Auto,
    Simple,
    Rasch,
    Both,
}

impl FromStr for MethodPreference {
    type Err = CalibrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(MethodPreference::Auto),
            "simple" => Ok(MethodPreference::Simple),
            "rasch" | "irt" => Ok(MethodPreference::Rasch),
            "both" => Ok(MethodPreference::Both),
            _ => Err(CalibrationError::InvalidOption {
                name: "method",
                value: s.to_string(),
                reason: "valid options are 'auto', 'simple', 'rasch' (or 'irt'), 'both'",
            }),
        }
    }
}

/// The full configuration of one calibration run.
///
/// Fields
/// ------
/// - `preference`: [`MethodPreference`]
/// - `rasch`: [`RaschOptions`]
/// - `density`: [`DensityPolicy`]
/// - `random_seed`: `Option<u64>`
///   Seeds the Rasch initialization; `None` draws from OS entropy.
/// - `min_recommended_responses`: `usize`
///   Items below this count trigger a sparse-item advisory before Rasch.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationOptions {
    pub preference: MethodPreference,
    pub rasch: RaschOptions,
    pub density: DensityPolicy,
    pub random_seed: Option<u64>,
    pub min_recommended_responses: usize,
}

impl CalibrationOptions {
    pub fn new(
        preference: MethodPreference, rasch: RaschOptions, density: DensityPolicy,
        random_seed: Option<u64>, min_recommended_responses: usize,
    ) -> CalibrationOptions {
        CalibrationOptions { preference, rasch, density, random_seed, min_recommended_responses }
    }

    /// Default options with the given preference and seed.
    pub fn with_method(preference: MethodPreference, random_seed: Option<u64>) -> Self {
        CalibrationOptions { preference, random_seed, ..CalibrationOptions::default() }
    }
}

impl Default for CalibrationOptions {
    fn default() -> Self {
        CalibrationOptions {
            preference: MethodPreference::Auto,
            rasch: RaschOptions::default(),
            density: DensityPolicy::default(),
            random_seed: None,
            min_recommended_responses: DEFAULT_MIN_RECOMMENDED_RESPONSES,
        }
    }
}
