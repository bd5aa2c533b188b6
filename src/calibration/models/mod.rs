//! models — the two difficulty estimators.
//!
//! Purpose
//! -------
//! Turn a validated [`ResponseDataset`](crate::calibration::core::data::ResponseDataset)
//! into raw per-question difficulties. Normalization, classification, and
//! method choice live in [`crate::calibration::core`] and
//! [`crate::calibration::calibrate`].
//!
//! Key behaviors
//! -------------
//! - [`SimpleEstimator`]: `1 − correct rate`, one pass, no optimization.
//! - [`RaschModel`]: joint ability/difficulty maximum likelihood under the
//!   1PL model via the crate's L-BFGS optimizer, with multi-start, optional
//!   centering, and convergence flagging.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`rasch`] cover value/gradient agreement, shift
//!   invariance, clipping, degenerate data, and budget exhaustion.
//! - Rank recovery on a synthetic 50 × 30 pool is covered by the
//!   integration test under `tests/`.

pub mod rasch;
pub mod simple;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::rasch::{RaschFit, RaschModel, StartSummary};
pub use self::simple::SimpleEstimator;

pub mod prelude {
    pub use super::rasch::{RaschFit, RaschModel};
    pub use super::simple::SimpleEstimator;
}
