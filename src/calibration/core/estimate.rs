//! Calibration artifacts: per-item difficulty records, per-student
//! abilities, category counts, and a dataset summary.
//!
//! Everything here is immutable once built and `Serialize`, so an export
//! collaborator can write it out without further conversion.
use crate::calibration::core::{category::DifficultyCategory, data::ResponseDataset};
use ndarray::Array1;
use serde::Serialize;

/// One calibrated item, the record consumed by an item bank.
///
/// `normalized_difficulty` and `category` are always consistent under the
/// fixed thresholds of [`DifficultyCategory::from_normalized`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifficultyEstimate {
    pub question_key: String,
    pub raw_difficulty: f64,
    pub normalized_difficulty: f64,
    pub category: DifficultyCategory,
    pub response_count: usize,
    pub empirical_correct_rate: f64,
}

/// Per-student Rasch ability on the logit scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilityEstimate {
    pub student_key: String,
    pub ability: f64,
    pub response_count: usize,
}

/// Zip raw and normalized difficulties with the dataset's per-question
/// counts, in question-index order.
///
/// Callers guarantee `raw.len() == normalized.len() == dataset.n_questions()`.
pub fn build_difficulty_estimates(
    dataset: &ResponseDataset, raw: &Array1<f64>, normalized: &Array1<f64>,
) -> Vec<DifficultyEstimate> {
    let questions = dataset.questions().keys();
    let counts = dataset.response_counts();
    let correct = dataset.correct_counts();
    questions
        .iter()
        .zip(raw.iter())
        .zip(normalized.iter())
        .enumerate()
        .map(|(j, ((key, &raw_difficulty), &normalized_difficulty))| DifficultyEstimate {
            question_key: key.clone(),
            raw_difficulty,
            normalized_difficulty,
            category: DifficultyCategory::from_normalized(normalized_difficulty),
            response_count: counts[j],
            empirical_correct_rate: correct[j] as f64 / counts[j] as f64,
        })
        .collect()
}

/// Easy/Medium/Hard counts of one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CategoryDistribution {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

impl CategoryDistribution {
    pub fn from_estimates(estimates: &[DifficultyEstimate]) -> Self {
        estimates.iter().fold(CategoryDistribution::default(), |mut acc, e| {
            match e.category {
                DifficultyCategory::Easy => acc.easy += 1,
                DifficultyCategory::Medium => acc.medium += 1,
                DifficultyCategory::Hard => acc.hard += 1,
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.easy + self.medium + self.hard
    }

    /// Share of items in `category`; 0 for an empty distribution.
    pub fn share(&self, category: DifficultyCategory) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let count = match category {
            DifficultyCategory::Easy => self.easy,
            DifficultyCategory::Medium => self.medium,
            DifficultyCategory::Hard => self.hard,
        };
        count as f64 / total as f64
    }
}

/// Shape and density of a response dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub total_responses: usize,
    pub n_students: usize,
    pub n_questions: usize,
    pub overall_correct_rate: f64,
    pub responses_per_question: f64,
    pub min_responses_per_question: usize,
}

impl DatasetSummary {
    pub fn from_dataset(dataset: &ResponseDataset) -> Self {
        DatasetSummary {
            total_responses: dataset.n_observations(),
            n_students: dataset.n_students(),
            n_questions: dataset.n_questions(),
            overall_correct_rate: dataset.overall_correct_rate(),
            responses_per_question: dataset.responses_per_question(),
            min_responses_per_question: dataset
                .response_counts()
                .iter()
                .copied()
                .min()
                .unwrap_or(0),
        }
    }
}
