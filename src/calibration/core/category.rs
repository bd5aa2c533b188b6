//! Three-level difficulty categories with fixed thresholds.
//!
//! Boundaries belong to the higher bucket: `0.3` is `Medium` and `0.7` is
//! `Hard`. The thresholds are shared by both estimators so their outputs are
//! comparable.
use serde::Serialize;

/// Lower bound (inclusive) of the `Medium` bucket.
pub const MEDIUM_THRESHOLD: f64 = 0.3;

/// Lower bound (inclusive) of the `Hard` bucket.
pub const HARD_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DifficultyCategory {
    Easy,
    Medium,
    Hard,
}

impl DifficultyCategory {
    /// Classify a normalized difficulty in `[0, 1]`.
    pub fn from_normalized(normalized: f64) -> Self {
        if normalized < MEDIUM_THRESHOLD {
            DifficultyCategory::Easy
        } else if normalized < HARD_THRESHOLD {
            DifficultyCategory::Medium
        } else {
            DifficultyCategory::Hard
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyCategory::Easy => "Easy",
            DifficultyCategory::Medium => "Medium",
            DifficultyCategory::Hard => "Hard",
        }
    }
}

impl std::fmt::Display for DifficultyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
