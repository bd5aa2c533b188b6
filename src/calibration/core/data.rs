//! Response dataset containers for item calibration.
//!
//! Purpose
//! -------
//! Turn an ordered sequence of `(student, question, correct)` observations
//! into a frozen, index-based table that both estimators consume. This
//! module centralizes the dataset-level checks (non-empty, every declared
//! student/question observed) so downstream code can assume clean input.
//!
//! Key behaviors
//! -------------
//! - [`Observation`] is the immutable input triple.
//! - [`ResponseDataset`] builds two index maps by first-occurrence order and
//!   stores the observations as parallel index/outcome columns, plus
//!   per-question response and correct counts.
//!
//! Invariants & assumptions
//! ------------------------
//! - `n_observations() > 0`, and every question/student index has at least
//!   one observation.
//! - Index maps are bijections onto `[0, n)` and are never mutated after
//!   construction.
//! - `student_idx[k] < n_students()` and `question_idx[k] < n_questions()`
//!   for every observation `k`.
//!
//! Conventions
//! -----------
//! - Indices are 0-based and assigned in order of first appearance, so the
//!   same observation order always yields the same indices.
//! - Identifier strings are opaque; they are neither trimmed nor
//!   case-folded here.
use crate::calibration::errors::{CalibrationError, CalibrationResult};
use std::collections::HashMap;

/// One graded response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Observation {
    pub student_key: String,
    pub question_key: String,
    pub correct: bool,
}

impl Observation {
    pub fn new(student_key: impl Into<String>, question_key: impl Into<String>, correct: bool) -> Self {
        Observation { student_key: student_key.into(), question_key: question_key.into(), correct }
    }
}

/// Frozen first-occurrence bijection between opaque keys and `[0, n)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndexMap {
    keys: Vec<String>,
    index: HashMap<String, usize>,
}

impl IndexMap {
    fn insert(&mut self, key: &str) -> usize {
        if let Some(&idx) = self.index.get(key) {
            return idx;
        }
        let idx = self.keys.len();
        self.keys.push(key.to_string());
        self.index.insert(key.to_string(), idx);
        idx
    }

    /// Index assigned to `key`, if present.
    pub fn get(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Key stored at `idx`.
    pub fn key(&self, idx: usize) -> Option<&str> {
        self.keys.get(idx).map(String::as_str)
    }

    /// Keys in index order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Validated, index-based response table.
///
/// Purpose
/// -------
/// Hold the observations of one calibration run as flat index columns so the
/// likelihood can be evaluated as a single pass over arrays rather than a
/// row-by-row walk over string keys.
///
/// Fields
/// ------
/// - `students` / `questions`: [`IndexMap`]
///   First-occurrence index maps.
/// - `student_idx` / `question_idx`: `Vec<usize>`
///   Per-observation indices, in input order.
/// - `outcomes`: `Vec<bool>`
///   Per-observation correctness, in input order.
/// - `response_counts` / `correct_counts`: `Vec<usize>`
///   Per-question totals, indexed by question index.
/// - `student_counts`: `Vec<usize>`
///   Per-student totals, indexed by student index.
///
/// Invariants
/// ----------
/// - All per-observation columns have the same, non-zero length.
/// - `response_counts[j] > 0` for every question `j`, and every student has
///   at least one observation.
///
/// Performance
/// -----------
/// - Construction is O(n) in the number of observations with one hash lookup
///   per key.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDataset {
    students: IndexMap,
    questions: IndexMap,
    student_idx: Vec<usize>,
    question_idx: Vec<usize>,
    outcomes: Vec<bool>,
    response_counts: Vec<usize>,
    correct_counts: Vec<usize>,
    student_counts: Vec<usize>,
}

impl ResponseDataset {
    /// Build a dataset from observations, indexing keys by first occurrence.
    ///
    /// Errors
    /// ------
    /// - `CalibrationError::EmptyDataset`
    ///   Returned when `observations` is empty.
    ///
    /// Notes
    /// -----
    /// - The zero-response checks of [`ResponseDataset::with_declared`] are
    ///   still run here but cannot fire, since every indexed key comes from an
    ///   observation.
    pub fn new(observations: &[Observation]) -> CalibrationResult<Self> {
        Self::with_declared(&[], &[], observations)
    }

    /// Build a dataset against a declared roster of students and questions.
    ///
    /// Declared keys are indexed first, in the given order; keys that only
    /// appear in `observations` are appended by first occurrence.
    ///
    /// Errors
    /// ------
    /// - `CalibrationError::EmptyDataset`
    ///   Returned when `observations` is empty.
    /// - `CalibrationError::QuestionWithoutResponses { question_key }`
    ///   Returned for the first question (in index order) with no responses.
    /// - `CalibrationError::StudentWithoutResponses { student_key }`
    ///   Returned for the first student (in index order) with no responses.
    pub fn with_declared(
        declared_students: &[String], declared_questions: &[String], observations: &[Observation],
    ) -> CalibrationResult<Self> {
        if observations.is_empty() {
            return Err(CalibrationError::EmptyDataset);
        }

        let mut students = IndexMap::default();
        let mut questions = IndexMap::default();
        for key in declared_students {
            students.insert(key);
        }
        for key in declared_questions {
            questions.insert(key);
        }

        let n = observations.len();
        let mut student_idx = Vec::with_capacity(n);
        let mut question_idx = Vec::with_capacity(n);
        let mut outcomes = Vec::with_capacity(n);
        for obs in observations {
            student_idx.push(students.insert(&obs.student_key));
            question_idx.push(questions.insert(&obs.question_key));
            outcomes.push(obs.correct);
        }

        let mut response_counts = vec![0usize; questions.len()];
        let mut correct_counts = vec![0usize; questions.len()];
        let mut student_counts = vec![0usize; students.len()];
        for ((&s, &q), &y) in student_idx.iter().zip(question_idx.iter()).zip(outcomes.iter()) {
            response_counts[q] += 1;
            student_counts[s] += 1;
            if y {
                correct_counts[q] += 1;
            }
        }

        if let Some(j) = response_counts.iter().position(|&c| c == 0) {
            return Err(CalibrationError::QuestionWithoutResponses {
                question_key: questions.keys[j].clone(),
            });
        }
        if let Some(i) = student_counts.iter().position(|&c| c == 0) {
            return Err(CalibrationError::StudentWithoutResponses {
                student_key: students.keys[i].clone(),
            });
        }

        Ok(ResponseDataset {
            students,
            questions,
            student_idx,
            question_idx,
            outcomes,
            response_counts,
            correct_counts,
            student_counts,
        })
    }

    pub fn n_students(&self) -> usize {
        self.students.len()
    }

    pub fn n_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn n_observations(&self) -> usize {
        self.outcomes.len()
    }

    /// Length of the joint Rasch parameter vector.
    pub fn n_params(&self) -> usize {
        self.n_students() + self.n_questions()
    }

    pub fn students(&self) -> &IndexMap {
        &self.students
    }

    pub fn questions(&self) -> &IndexMap {
        &self.questions
    }

    pub fn student_idx(&self) -> &[usize] {
        &self.student_idx
    }

    pub fn question_idx(&self) -> &[usize] {
        &self.question_idx
    }

    pub fn outcomes(&self) -> &[bool] {
        &self.outcomes
    }

    /// Number of responses per question, by question index.
    pub fn response_counts(&self) -> &[usize] {
        &self.response_counts
    }

    /// Number of correct responses per question, by question index.
    pub fn correct_counts(&self) -> &[usize] {
        &self.correct_counts
    }

    /// Number of responses per student, by student index.
    pub fn student_response_counts(&self) -> &[usize] {
        &self.student_counts
    }

    /// Mean of `correct` over question `j`'s responses.
    ///
    /// Returns `None` if `j` is out of range.
    pub fn empirical_correct_rate(&self, j: usize) -> Option<f64> {
        let total = *self.response_counts.get(j)?;
        Some(self.correct_counts[j] as f64 / total as f64)
    }

    /// Correct rate over every observation in the dataset.
    pub fn overall_correct_rate(&self) -> f64 {
        let correct: usize = self.correct_counts.iter().sum();
        correct as f64 / self.n_observations() as f64
    }

    /// `total_observations / n_questions`.
    pub fn responses_per_question(&self) -> f64 {
        self.n_observations() as f64 / self.n_questions() as f64
    }

    /// `true` if every observation carries the same outcome.
    pub fn is_outcome_constant(&self) -> bool {
        let correct: usize = self.correct_counts.iter().sum();
        correct == 0 || correct == self.n_observations()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - First-occurrence indexing and derived counts.
    // - Insufficient-data failures (empty, undeclared-but-missing items).
    //
    // They intentionally DO NOT cover:
    // - Estimation on top of the dataset (see the estimator modules).
    // -------------------------------------------------------------------------

    fn obs(s: &str, q: &str, y: bool) -> Observation {
        Observation::new(s, q, y)
    }

    #[test]
    // Purpose
    // -------
    // Indices follow first occurrence and counts are aggregated per question.
    //
    // Given
    // -----
    // - Three observations over two students and two questions.
    //
    // Expect
    // ------
    // - "s2" → 0, "s1" → 1; "q9" → 0, "q1" → 1.
    // - Correct rates 0.5 and 1.0.
    fn new_indexes_by_first_occurrence_and_counts_responses() {
        // Arrange
        let data = vec![obs("s2", "q9", true), obs("s1", "q1", true), obs("s1", "q9", false)];

        // Act
        let ds = ResponseDataset::new(&data).unwrap();

        // Assert
        assert_eq!(ds.students().get("s2"), Some(0));
        assert_eq!(ds.students().get("s1"), Some(1));
        assert_eq!(ds.questions().key(0), Some("q9"));
        assert_eq!(ds.student_idx(), &[0, 1, 1]);
        assert_eq!(ds.question_idx(), &[0, 1, 0]);
        assert_eq!(ds.response_counts(), &[2, 1]);
        assert_eq!(ds.student_response_counts(), &[1, 2]);
        assert_eq!(ds.empirical_correct_rate(0), Some(0.5));
        assert_eq!(ds.empirical_correct_rate(1), Some(1.0));
        assert_eq!(ds.empirical_correct_rate(2), None);
        assert_eq!(ds.responses_per_question(), 1.5);
        assert_eq!(ds.n_params(), 4);
        assert!(!ds.is_outcome_constant());
    }

    #[test]
    fn new_rejects_empty_dataset() {
        assert_eq!(ResponseDataset::new(&[]), Err(CalibrationError::EmptyDataset));
    }

    #[test]
    // Purpose
    // -------
    // A declared question with zero observations is an insufficient-data
    // error naming that question.
    //
    // Given
    // -----
    // - 10 students and 5 declared questions; "Q3" never answered.
    //
    // Expect
    // ------
    // - `QuestionWithoutResponses { question_key: "Q3" }`.
    fn with_declared_reports_question_without_responses() {
        // Arrange
        let students: Vec<String> = (1..=10).map(|i| format!("S{i:03}")).collect();
        let questions: Vec<String> = (1..=5).map(|j| format!("Q{j}")).collect();
        let data: Vec<Observation> = students
            .iter()
            .flat_map(|s| {
                questions
                    .iter()
                    .filter(|q| q.as_str() != "Q3")
                    .map(move |q| obs(s, q, s.ends_with('1')))
            })
            .collect();

        // Act
        let result = ResponseDataset::with_declared(&students, &questions, &data);

        // Assert
        let err = result.unwrap_err();
        assert!(err.is_insufficient_data());
        assert_eq!(err, CalibrationError::QuestionWithoutResponses { question_key: "Q3".into() });
    }

    #[test]
    fn with_declared_reports_student_without_responses() {
        let students = vec!["A".to_string(), "B".to_string()];
        let data = vec![obs("A", "q1", true), obs("A", "q2", false)];

        let err = ResponseDataset::with_declared(&students, &[], &data).unwrap_err();

        assert_eq!(err, CalibrationError::StudentWithoutResponses { student_key: "B".into() });
    }

    #[test]
    fn constant_outcomes_are_detected() {
        let data = vec![obs("a", "q1", false), obs("b", "q2", false)];
        let ds = ResponseDataset::new(&data).unwrap();
        assert!(ds.is_outcome_constant());
        assert_eq!(ds.overall_correct_rate(), 0.0);
    }
}
