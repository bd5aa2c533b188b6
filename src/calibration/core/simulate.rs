//! Synthetic Rasch response generator.
//!
//! Produces a complete student × question response matrix whose outcomes
//! are drawn from the exact Rasch probability, together with the true
//! parameters, for regression tests and estimator sanity checks.
//!
//! - Abilities ~ N(0, 1), drawn with `statrs::distribution::Normal`.
//! - Difficulties evenly spaced on `[−2, 2]`.
//! - Keys are zero-padded: `S001…`, `Q001…`.
//! - Observations are emitted student-major, question-minor.
use crate::{
    calibration::{
        core::data::Observation,
        errors::{CalibrationError, CalibrationResult},
    },
    optimization::numerical_stability::safe_logistic,
};
use ndarray::Array1;
use rand::{Rng, distributions::Distribution};
use statrs::distribution::Normal;

/// Lowest true difficulty of the simulated item pool.
pub const SIM_DIFFICULTY_MIN: f64 = -2.0;

/// Highest true difficulty of the simulated item pool.
pub const SIM_DIFFICULTY_MAX: f64 = 2.0;

/// Simulated observations plus the parameters that generated them.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedResponses {
    pub observations: Vec<Observation>,
    pub true_abilities: Array1<f64>,
    pub true_difficulties: Array1<f64>,
}

pub fn student_key(i: usize) -> String {
    format!("S{:03}", i + 1)
}

pub fn question_key(j: usize) -> String {
    format!("Q{:03}", j + 1)
}

/// Draw a full response matrix under the Rasch model.
///
/// Errors
/// ------
/// - `CalibrationError::InvalidOption`
///   Returned when `n_students` or `n_questions` is zero.
pub fn simulate_rasch_responses<R: Rng + ?Sized>(
    n_students: usize, n_questions: usize, rng: &mut R,
) -> CalibrationResult<SimulatedResponses> {
    if n_students == 0 {
        return Err(CalibrationError::InvalidOption {
            name: "n_students",
            value: n_students.to_string(),
            reason: "must be at least 1",
        });
    }
    if n_questions == 0 {
        return Err(CalibrationError::InvalidOption {
            name: "n_questions",
            value: n_questions.to_string(),
            reason: "must be at least 1",
        });
    }

    let standard_normal = Normal::new(0.0, 1.0).map_err(|_| CalibrationError::InvalidOption {
        name: "ability_distribution",
        value: "N(0, 1)".to_string(),
        reason: "standard normal rejected by statrs",
    })?;
    let true_abilities: Array1<f64> =
        (0..n_students).map(|_| standard_normal.sample(rng)).collect();
    let true_difficulties = Array1::linspace(SIM_DIFFICULTY_MIN, SIM_DIFFICULTY_MAX, n_questions);

    let mut observations = Vec::with_capacity(n_students * n_questions);
    for (i, &ability) in true_abilities.iter().enumerate() {
        for (j, &difficulty) in true_difficulties.iter().enumerate() {
            let p = safe_logistic(ability - difficulty);
            let correct = rng.gen::<f64>() < p;
            observations.push(Observation::new(student_key(i), question_key(j), correct));
        }
    }

    Ok(SimulatedResponses { observations, true_abilities, true_difficulties })
}
