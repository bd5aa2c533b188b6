//! Calibration pipeline: select methods, estimate, normalize, classify.
//!
//! Purpose
//! -------
//! Tie the dataset, the method selector, both estimators, the normalizer,
//! and the category rule into one call that returns a report per method.
//! This is the only layer that logs; everything below it returns warnings
//! as values.
//!
//! Key behaviors
//! -------------
//! - [`calibrate`] seeds a `StdRng` from `options.random_seed` (or OS
//!   entropy) and delegates to [`calibrate_with_rng`].
//! - The Simple path normalizes with [`SIMPLE_MIN_RANGE`] (rescale whenever
//!   `max > min`); the Rasch path uses `rasch.min_difficulty_range`.
//! - The Rasch report carries the selector's density warning, a sparse-item
//!   advisory for the sparsest question, the fit's own warnings, and the
//!   normalizer's warning, in that order.
//!
//! Invariants & assumptions
//! ------------------------
//! - Reports appear in the order of `selection.methods` (Simple first).
//! - Every report has one estimate per question, in question-index order.
//!
//! Conventions
//! -----------
//! - `info!` for the dataset shape and selected methods, `debug!` per Rasch
//!   start, `warn!` once per attached warning.
use crate::calibration::{
    core::{
        data::{Observation, ResponseDataset},
        estimate::{
            AbilityEstimate, CategoryDistribution, DatasetSummary, DifficultyEstimate,
            build_difficulty_estimates,
        },
        normalize::{SIMPLE_MIN_RANGE, normalize_difficulties},
        options::CalibrationOptions,
        selector::{EstimationMethod, MethodSelection, select_methods},
    },
    errors::{CalibrationResult, CalibrationWarning},
    models::{rasch::RaschModel, simple::SimpleEstimator},
};
use ndarray::Array1;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Rasch-specific diagnostics of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaschDiagnostics {
    pub log_likelihood: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    /// Number of random starts that were attempted.
    pub starts: usize,
    pub abilities: Vec<AbilityEstimate>,
}

/// Result of one estimation method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibrationReport {
    pub method: EstimationMethod,
    /// One record per question, in question-index order.
    pub estimates: Vec<DifficultyEstimate>,
    pub distribution: CategoryDistribution,
    pub warnings: Vec<CalibrationWarning>,
    /// Present only for [`EstimationMethod::Rasch`].
    pub rasch: Option<RaschDiagnostics>,
}

impl CalibrationReport {
    fn new(
        method: EstimationMethod, estimates: Vec<DifficultyEstimate>,
        warnings: Vec<CalibrationWarning>, rasch: Option<RaschDiagnostics>,
    ) -> Self {
        let distribution = CategoryDistribution::from_estimates(&estimates);
        CalibrationReport { method, estimates, distribution, warnings, rasch }
    }

    /// Estimates ordered by ascending normalized difficulty, ties by question key.
    pub fn sorted_by_difficulty(&self) -> Vec<&DifficultyEstimate> {
        let mut sorted: Vec<&DifficultyEstimate> = self.estimates.iter().collect();
        sorted.sort_by(|a, b| {
            a.normalized_difficulty
                .total_cmp(&b.normalized_difficulty)
                .then_with(|| a.question_key.cmp(&b.question_key))
        });
        sorted
    }

    /// Normalized difficulties in question-index order.
    pub fn normalized_difficulties(&self) -> Array1<f64> {
        self.estimates.iter().map(|e| e.normalized_difficulty).collect()
    }

    pub fn estimate(&self, question_key: &str) -> Option<&DifficultyEstimate> {
        self.estimates.iter().find(|e| e.question_key == question_key)
    }

    pub fn has_low_variation(&self) -> bool {
        self.warnings.iter().any(|w| matches!(w, CalibrationWarning::LowVariation { .. }))
    }
}

/// Everything one calibration run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibrationOutcome {
    pub summary: DatasetSummary,
    pub selection: MethodSelection,
    pub reports: Vec<CalibrationReport>,
}

impl CalibrationOutcome {
    pub fn report(&self, method: EstimationMethod) -> Option<&CalibrationReport> {
        self.reports.iter().find(|r| r.method == method)
    }
}

/// Calibrate with the random source described by `options.random_seed`.
///
/// Errors
/// ------
/// - See [`calibrate_with_rng`].
pub fn calibrate(
    dataset: &ResponseDataset, options: &CalibrationOptions,
) -> CalibrationResult<CalibrationOutcome> {
    let mut rng = match options.random_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    calibrate_with_rng(dataset, options, &mut rng)
}

/// Build the dataset from `observations`, then [`calibrate`].
///
/// Errors
/// ------
/// - `CalibrationError::EmptyDataset` for an empty slice, plus everything
///   [`calibrate_with_rng`] returns.
pub fn calibrate_observations(
    observations: &[Observation], options: &CalibrationOptions,
) -> CalibrationResult<CalibrationOutcome> {
    let dataset = ResponseDataset::new(observations)?;
    calibrate(&dataset, options)
}

/// Run every selected method on `dataset`, drawing Rasch starts from `rng`.
///
/// Steps
/// -----
/// 1. Summarize the dataset and select methods from its
///    responses-per-question density.
/// 2. Simple: `1 − correct rate`, normalized with [`SIMPLE_MIN_RANGE`].
/// 3. Rasch: sparse-item advisory, multi-start fit, normalization with
///    `min_difficulty_range`, ability records.
/// 4. Classify every normalized difficulty and count categories.
///
/// Errors
/// ------
/// - `CalibrationError::EstimationFailed` when every Rasch start fails.
/// - `CalibrationError::NonFiniteDifficulty` when an estimator produced a
///   NaN or infinite raw difficulty.
/// - `CalibrationError::InvalidOption` for an unusable `init_scale`.
pub fn calibrate_with_rng<R: Rng + ?Sized>(
    dataset: &ResponseDataset, options: &CalibrationOptions, rng: &mut R,
) -> CalibrationResult<CalibrationOutcome> {
    let summary = DatasetSummary::from_dataset(dataset);
    let selection =
        select_methods(summary.responses_per_question, options.preference, &options.density);
    info!(
        n_students = summary.n_students,
        n_questions = summary.n_questions,
        total_responses = summary.total_responses,
        responses_per_question = summary.responses_per_question,
        band = ?selection.band,
        methods = ?selection.methods,
        "calibrating item difficulties"
    );

    let mut reports = Vec::with_capacity(selection.methods.len());
    for &method in &selection.methods {
        let report = match method {
            EstimationMethod::Simple => run_simple(dataset)?,
            EstimationMethod::Rasch => run_rasch(dataset, options, &selection, rng)?,
        };
        for warning in &report.warnings {
            warn!(method = %method, "{warning}");
        }
        reports.push(report);
    }

    Ok(CalibrationOutcome { summary, selection, reports })
}

fn run_simple(dataset: &ResponseDataset) -> CalibrationResult<CalibrationReport> {
    let raw = SimpleEstimator.raw_difficulties(dataset);
    let normalized = normalize_difficulties(&raw, SIMPLE_MIN_RANGE)?;
    let estimates = build_difficulty_estimates(dataset, &raw, &normalized.values);
    let warnings = normalized.warning.into_iter().collect();
    Ok(CalibrationReport::new(EstimationMethod::Simple, estimates, warnings, None))
}

fn run_rasch<R: Rng + ?Sized>(
    dataset: &ResponseDataset, options: &CalibrationOptions, selection: &MethodSelection,
    rng: &mut R,
) -> CalibrationResult<CalibrationReport> {
    let mut warnings = selection.warnings.clone();
    warnings.extend(sparse_item_advisory(dataset, options.min_recommended_responses));

    let mut model = RaschModel::new(options.rasch.clone());
    let fit = model.fit_with_rng(dataset, rng)?;
    for start in &fit.starts {
        debug!(
            start = start.start,
            nll = ?start.log_likelihood.map(|ll| -ll),
            iterations = start.iterations,
            status = %start.status,
            "rasch start finished"
        );
    }
    warnings.extend(fit.warnings.iter().cloned());

    let normalized = normalize_difficulties(&fit.raw_difficulties, options.rasch.min_difficulty_range)?;
    warnings.extend(normalized.warning);
    let estimates = build_difficulty_estimates(dataset, &fit.raw_difficulties, &normalized.values);

    let counts = dataset.student_response_counts();
    let abilities = dataset
        .students()
        .keys()
        .iter()
        .zip(fit.abilities.iter())
        .zip(counts.iter())
        .map(|((key, &ability), &response_count)| AbilityEstimate {
            student_key: key.clone(),
            ability,
            response_count,
        })
        .collect();
    let diagnostics = RaschDiagnostics {
        log_likelihood: fit.log_likelihood,
        converged: fit.converged,
        status: fit.status.clone(),
        iterations: fit.iterations,
        starts: fit.starts.len(),
        abilities,
    };

    Ok(CalibrationReport::new(EstimationMethod::Rasch, estimates, warnings, Some(diagnostics)))
}

/// One `SparseItems` warning naming the question with the fewest responses,
/// if that count is below `recommended`. Ties go to the lowest index.
fn sparse_item_advisory(
    dataset: &ResponseDataset, recommended: usize,
) -> Option<CalibrationWarning> {
    let (j, &responses) =
        dataset.response_counts().iter().enumerate().min_by_key(|&(j, &c)| (c, j))?;
    if responses >= recommended {
        return None;
    }
    let question_key = dataset.questions().key(j)?.to_string();
    Some(CalibrationWarning::SparseItems { question_key, responses, recommended })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::core::{
        category::DifficultyCategory, options::MethodPreference,
        simulate::simulate_rasch_responses,
    };
    use approx::assert_abs_diff_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Which reports are produced for each preference and density.
    // - Warning placement (density, sparse items, low variation).
    // - The sorted view and ability records.
    //
    // They intentionally DO NOT cover:
    // - Estimator internals (see `models::rasch` and `models::simple`).
    // -------------------------------------------------------------------------

    fn grid(n_students: usize, rates: &[usize]) -> Vec<Observation> {
        // question j is answered correctly by the first rates[j] students
        let mut obs = Vec::new();
        for i in 0..n_students {
            for (j, &k) in rates.iter().enumerate() {
                obs.push(Observation::new(format!("s{i}"), format!("q{j}"), i < k));
            }
        }
        obs
    }

    #[test]
    // Purpose
    // -------
    // A sparse dataset under `Auto` yields a single Simple report whose
    // extremes map to 0 and 1.
    //
    // Given
    // -----
    // - 10 students, 3 questions with correct counts 9, 5, 1.
    //
    // Expect
    // ------
    // - One Simple report; q0 → 0 (Easy), q2 → 1 (Hard), no warnings.
    fn sparse_auto_runs_simple_only() {
        // Arrange
        let obs = grid(10, &[9, 5, 1]);
        let options = CalibrationOptions::with_method(MethodPreference::Auto, Some(3));

        // Act
        let out = calibrate_observations(&obs, &options).unwrap();

        // Assert
        assert_eq!(out.reports.len(), 1);
        let report = out.report(EstimationMethod::Simple).unwrap();
        assert!(report.warnings.is_empty());
        assert!(report.rasch.is_none());
        assert_abs_diff_eq!(report.estimates[0].normalized_difficulty, 0.0);
        assert_abs_diff_eq!(report.estimates[1].normalized_difficulty, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(report.estimates[2].normalized_difficulty, 1.0);
        assert_eq!(report.estimates[0].category, DifficultyCategory::Easy);
        assert_eq!(report.estimates[2].category, DifficultyCategory::Hard);
        assert_eq!(report.distribution, CategoryDistribution { easy: 1, medium: 1, hard: 1 });
    }

    #[test]
    // Purpose
    // -------
    // Requesting both methods in the sparse band runs both and attaches the
    // density and sparse-item warnings to the Rasch report only.
    fn explicit_rasch_in_sparse_band_is_flagged() {
        // Arrange
        let mut rng = StdRng::seed_from_u64(8);
        let sim = simulate_rasch_responses(20, 6, &mut rng).unwrap();
        let ds = ResponseDataset::new(&sim.observations).unwrap();
        let options = CalibrationOptions::with_method(MethodPreference::Both, Some(8));

        // Act
        let out = calibrate(&ds, &options).unwrap();

        // Assert
        let methods: Vec<_> = out.reports.iter().map(|r| r.method).collect();
        assert_eq!(methods, vec![EstimationMethod::Simple, EstimationMethod::Rasch]);
        assert!(out.reports[0].warnings.is_empty());
        let rasch = &out.reports[1];
        assert!(matches!(
            rasch.warnings.as_slice(),
            [
                CalibrationWarning::RaschBelowDensity { .. },
                CalibrationWarning::SparseItems { responses: 20, recommended: 50, .. },
                ..
            ]
        ));
        let diag = rasch.rasch.as_ref().unwrap();
        assert_eq!(diag.starts, 1);
        assert_eq!(diag.abilities.len(), 20);
        assert!(diag.abilities.iter().all(|a| a.response_count == 6));
    }

    #[test]
    // Purpose
    // -------
    // All-correct data degrades to 0.5 everywhere with a low-variation
    // warning on both paths.
    fn constant_outcomes_are_flagged_on_both_paths() {
        let obs = grid(40, &[40, 40, 40]);
        let options = CalibrationOptions::with_method(MethodPreference::Both, Some(1));

        let out = calibrate_observations(&obs, &options).unwrap();

        for report in &out.reports {
            assert!(report.has_low_variation());
            assert!(report.estimates.iter().all(|e| e.normalized_difficulty == 0.5));
            assert_eq!(report.distribution.medium, 3);
        }
        let rasch = out.report(EstimationMethod::Rasch).unwrap();
        assert!(
            rasch
                .warnings
                .iter()
                .any(|w| matches!(w, CalibrationWarning::NoResponseVariation { .. }))
        );
    }

    #[test]
    // Purpose
    // -------
    // The sorted view orders by normalized difficulty and breaks ties by key.
    fn sorted_view_orders_by_difficulty_then_key() {
        let obs = grid(10, &[2, 8, 8, 5]);
        let options = CalibrationOptions::with_method(MethodPreference::Simple, None);

        let out = calibrate_observations(&obs, &options).unwrap();
        let keys: Vec<&str> = out.reports[0]
            .sorted_by_difficulty()
            .iter()
            .map(|e| e.question_key.as_str())
            .collect();

        assert_eq!(keys, vec!["q1", "q2", "q3", "q0"]);
    }

    #[test]
    fn sparse_advisory_names_sparsest_question() {
        let mut obs = grid(60, &[30, 30]);
        obs.push(Observation::new("s0", "q9", true));
        obs.push(Observation::new("s1", "q9", false));
        let ds = ResponseDataset::new(&obs).unwrap();

        assert_eq!(
            sparse_item_advisory(&ds, 50),
            Some(CalibrationWarning::SparseItems {
                question_key: "q9".to_string(),
                responses: 2,
                recommended: 50,
            })
        );
        assert_eq!(sparse_item_advisory(&ds, 2), None);
    }
}
