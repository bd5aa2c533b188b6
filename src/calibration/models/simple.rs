//! Correct-rate difficulty estimator.
//!
//! `raw_difficulty[j] = 1 − empirical_correct_rate[j]`, a single pass over
//! the per-question counts already held by [`ResponseDataset`]. No
//! optimization is involved, so there are no failure modes beyond those the
//! dataset constructor rejects.
use crate::calibration::core::data::ResponseDataset;
use ndarray::Array1;

/// Simple (classical test theory) estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimpleEstimator;

impl SimpleEstimator {
    /// Raw difficulties in question-index order, each in `[0, 1]`.
    pub fn raw_difficulties(&self, data: &ResponseDataset) -> Array1<f64> {
        data.response_counts()
            .iter()
            .zip(data.correct_counts().iter())
            .map(|(&total, &correct)| 1.0 - correct as f64 / total as f64)
            .collect()
    }
}
