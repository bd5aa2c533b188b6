//! Rasch (1PL) model: joint log-likelihood, analytic gradient, and fitting.
//!
//! This module wires the Rasch response model to the `LogLikelihood` trait.
//! The optimizer variable is the stacked vector
//! `θ = (abilities[0..n_students), difficulties[0..n_questions))` and each
//! observation contributes the clipped Bernoulli log-likelihood of
//! `σ(ability − difficulty)`.
//!
//! Key ideas:
//! - The likelihood is a single reduction over the dataset's flat index
//!   columns; no per-row key lookups.
//! - Probabilities are clipped to `[1e-10, 1 − 1e-10]` before logs, and a
//!   clipped term contributes zero gradient, so value and gradient describe
//!   the same objective.
//! - The model is invariant to adding a constant to every ability and every
//!   difficulty. The optimizer is left unconstrained; the flat direction is
//!   removed afterwards by min-max normalization, and optionally by
//!   centering abilities at mean 0.
//! - When every response has the same outcome no finite optimum exists, so
//!   optimization is skipped and all raw difficulties are reported as 0.
use crate::{
    calibration::{
        core::{data::ResponseDataset, options::RaschOptions},
        errors::{CalibrationError, CalibrationResult, CalibrationWarning},
    },
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{
            Grad, LogLikelihood, OptimOutcome, Theta, maximize, validation::validate_theta,
        },
        numerical_stability::bernoulli_loglik,
    },
};
use ndarray::{Array1, s};
use rand::{Rng, SeedableRng, distributions::Distribution, rngs::StdRng};
use statrs::distribution::Normal;

/// Diagnostics of one random start.
#[derive(Debug, Clone, PartialEq)]
pub struct StartSummary {
    pub start: usize,
    /// ℓ(θ̂) of this start, or `None` if the optimizer failed.
    pub log_likelihood: Option<f64>,
    pub iterations: usize,
    pub status: String,
}

/// Result of a Rasch fit.
///
/// `outcome` is `None` only when optimization was skipped because the
/// responses carry no variation.
#[derive(Debug, Clone, PartialEq)]
pub struct RaschFit {
    pub abilities: Array1<f64>,
    pub raw_difficulties: Array1<f64>,
    /// Best log-likelihood ℓ(θ̂); the negative log-likelihood is `-log_likelihood`.
    pub log_likelihood: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub starts: Vec<StartSummary>,
    pub outcome: Option<OptimOutcome>,
    pub warnings: Vec<CalibrationWarning>,
}

/// Rasch model with analytic log-likelihood and gradient.
///
/// After fitting, [`RaschModel::results`] holds the last [`RaschFit`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RaschModel {
    pub options: RaschOptions,
    pub results: Option<RaschFit>,
}

impl RaschModel {
    pub fn new(options: RaschOptions) -> RaschModel {
        RaschModel { options, results: None }
    }

    /// Fit with a seeded `StdRng`, or OS entropy when `seed` is `None`.
    pub fn fit(
        &mut self, data: &ResponseDataset, seed: Option<u64>,
    ) -> CalibrationResult<&RaschFit> {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        self.fit_with_rng(data, &mut rng)
    }

    /// Fit by maximum likelihood with an injected random source.
    ///
    /// ## Steps
    /// 1. If all outcomes are identical, skip optimization: abilities and
    ///    raw difficulties are 0 and a `NoResponseVariation` warning is attached.
    /// 2. Otherwise, for each of `options.restarts` starts, draw
    ///    `θ₀ ~ N(0, init_scale²)` and run L-BFGS per `options.mle_opts`.
    /// 3. Keep the start with the highest ℓ(θ̂) (lowest NLL). Failed starts
    ///    are recorded in `starts` and ignored.
    /// 4. If the winning run did not converge, attach a `Convergence` warning
    ///    and still return its best iterate.
    /// 5. If `center_abilities`, shift both blocks by the mean ability.
    ///
    /// ## Errors
    /// - `CalibrationError::EstimationFailed` if **every** start fails; the
    ///   last optimizer error is reported.
    /// - `CalibrationError::InvalidOption` if `init_scale` is rejected by the
    ///   normal sampler.
    pub fn fit_with_rng<R: Rng + ?Sized>(
        &mut self, data: &ResponseDataset, rng: &mut R,
    ) -> CalibrationResult<&RaschFit> {
        let fit = if data.is_outcome_constant() {
            self.skip_degenerate(data)?
        } else {
            self.fit_starts(data, rng)?
        };
        Ok(&*self.results.insert(fit))
    }

    fn fit_starts<R: Rng + ?Sized>(
        &self, data: &ResponseDataset, rng: &mut R,
    ) -> CalibrationResult<RaschFit> {
        let n_params = data.n_params();
        let init = Normal::new(0.0, self.options.init_scale).map_err(|_| {
            CalibrationError::InvalidOption {
                name: "init_scale",
                value: self.options.init_scale.to_string(),
                reason: "must be finite and positive",
            }
        })?;

        let mut best: Option<OptimOutcome> = None;
        let mut last_err: Option<OptError> = None;
        let mut starts = Vec::with_capacity(self.options.restarts);
        for start in 0..self.options.restarts {
            let theta0: Theta = (0..n_params).map(|_| init.sample(rng)).collect();
            match maximize(self, theta0, data, &self.options.mle_opts) {
                Ok(outcome) => {
                    starts.push(StartSummary {
                        start,
                        log_likelihood: Some(outcome.value),
                        iterations: outcome.iterations,
                        status: outcome.status.clone(),
                    });
                    if best.as_ref().map_or(true, |b| outcome.value > b.value) {
                        best = Some(outcome);
                    }
                }
                Err(err) => {
                    starts.push(StartSummary {
                        start,
                        log_likelihood: None,
                        iterations: 0,
                        status: err.to_string(),
                    });
                    last_err = Some(err);
                }
            }
        }

        let outcome = match (best, last_err) {
            (Some(outcome), _) => outcome,
            (None, Some(err)) => return Err(err.into()),
            (None, None) => return Err(OptError::MissingThetaHat.into()),
        };

        let n_students = data.n_students();
        let mut abilities = outcome.theta_hat.slice(s![..n_students]).to_owned();
        let mut raw_difficulties = outcome.theta_hat.slice(s![n_students..]).to_owned();
        if self.options.center_abilities {
            let shift = abilities.mean().unwrap_or(0.0);
            abilities -= shift;
            raw_difficulties -= shift;
        }

        let mut warnings = Vec::new();
        if !outcome.converged {
            warnings.push(CalibrationWarning::Convergence {
                status: outcome.status.clone(),
                iterations: outcome.iterations,
            });
        }

        Ok(RaschFit {
            abilities,
            raw_difficulties,
            log_likelihood: outcome.value,
            converged: outcome.converged,
            status: outcome.status.clone(),
            iterations: outcome.iterations,
            starts,
            outcome: Some(outcome),
            warnings,
        })
    }

    fn skip_degenerate(&self, data: &ResponseDataset) -> CalibrationResult<RaschFit> {
        let theta = Array1::zeros(data.n_params());
        let log_likelihood = self.value(&theta, data)?;
        Ok(RaschFit {
            abilities: Array1::zeros(data.n_students()),
            raw_difficulties: Array1::zeros(data.n_questions()),
            log_likelihood,
            converged: false,
            status: "Skipped: no response variation".to_string(),
            iterations: 0,
            starts: Vec::new(),
            outcome: None,
            warnings: vec![CalibrationWarning::NoResponseVariation {
                correct_rate: data.overall_correct_rate(),
            }],
        })
    }

    /// Negative log-likelihood at `theta`, the quantity the optimizer minimizes.
    pub fn negative_log_likelihood(&self, theta: &Theta, data: &ResponseDataset) -> OptResult<f64> {
        self.check(theta, data)?;
        Ok(-self.value(theta, data)?)
    }
}

impl LogLikelihood for RaschModel {
    type Data = ResponseDataset;

    /// Joint log-likelihood `Σ_obs [y·ln p + (1−y)·ln(1−p)]` with
    /// `p = clip(σ(θ_s − b_q))`.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        let n_students = data.n_students();
        let ll: f64 = data
            .student_idx()
            .iter()
            .zip(data.question_idx().iter())
            .zip(data.outcomes().iter())
            .map(|((&s, &q), &y)| bernoulli_loglik(theta[s] - theta[n_students + q], y).0)
            .sum();
        Ok(ll)
    }

    /// Checks `θ.len() == n_students + n_questions` and that all entries are finite.
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        validate_theta(theta, data.n_params())
    }

    /// Analytic gradient: each observation adds `y − p` to its student's
    /// ability slot and subtracts it from its question's difficulty slot
    /// (zero for clipped terms).
    fn grad(&self, theta: &Theta, data: &Self::Data) -> OptResult<Grad> {
        let n_students = data.n_students();
        let mut grad = Array1::<f64>::zeros(theta.len());
        for ((&s, &q), &y) in
            data.student_idx().iter().zip(data.question_idx().iter()).zip(data.outcomes().iter())
        {
            let (_, d) = bernoulli_loglik(theta[s] - theta[n_students + q], y);
            grad[s] += d;
            grad[n_students + q] -= d;
        }
        Ok(grad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        calibration::core::{data::Observation, simulate::simulate_rasch_responses},
        optimization::loglik_optimizer::{
            LineSearcher, MLEOptions, Tolerances, finite_diff::fd_gradient,
        },
    };
    use approx::assert_abs_diff_eq;
    use argmin::core::Error;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Likelihood value and analytic gradient on tiny hand-checked data.
    // - Shift invariance of the objective.
    // - Degenerate (constant-outcome) datasets and convergence flagging.
    // - Multi-start bookkeeping and centering.
    //
    // They intentionally DO NOT cover:
    // - Rank recovery on a realistic pool (see the integration test).
    // -------------------------------------------------------------------------

    fn small_dataset() -> ResponseDataset {
        let obs = vec![
            Observation::new("a", "q1", true),
            Observation::new("a", "q2", false),
            Observation::new("b", "q1", true),
            Observation::new("b", "q2", true),
            Observation::new("c", "q1", false),
            Observation::new("c", "q2", false),
        ];
        ResponseDataset::new(&obs).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // At θ = 0 every probability is 0.5, so ℓ = n·ln 0.5 and the gradient
    // counts (y − 0.5) per slot.
    fn value_and_gradient_at_zero() {
        // Arrange
        let model = RaschModel::default();
        let ds = small_dataset();
        let theta = Array1::zeros(ds.n_params());

        // Act
        let ll = model.value(&theta, &ds).unwrap();
        let g = model.grad(&theta, &ds).unwrap();

        // Assert
        assert_abs_diff_eq!(ll, 6.0 * 0.5_f64.ln(), epsilon = 1e-12);
        // abilities a, b, c then difficulties q1, q2
        assert_eq!(g, array![0.0, 1.0, -1.0, -0.5, 0.5]);
    }

    #[test]
    // Purpose
    // -------
    // The analytic gradient matches central finite differences of ℓ.
    fn analytic_gradient_matches_finite_differences() {
        let model = RaschModel::default();
        let ds = small_dataset();
        let theta = array![0.3, -1.2, 0.8, 0.5, -0.4];
        let cost = |t: &Theta| model.value(t, &ds).map_err(Error::from);

        let fd = fd_gradient(&theta, cost).unwrap();
        let analytic = model.grad(&theta, &ds).unwrap();

        for (a, b) in analytic.iter().zip(fd.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-6);
        }
    }

    #[test]
    // Purpose
    // -------
    // Adding a constant to all abilities and difficulties leaves ℓ unchanged.
    fn objective_is_shift_invariant() {
        let model = RaschModel::default();
        let ds = small_dataset();
        let theta = array![0.3, -1.2, 0.8, 0.5, -0.4];
        let shifted = &theta + 2.5;

        let a = model.value(&theta, &ds).unwrap();
        let b = model.value(&shifted, &ds).unwrap();

        assert_abs_diff_eq!(a, b, epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Saturated probabilities are clipped: the objective stays finite and
    // the clipped terms contribute no gradient.
    fn saturated_terms_are_clipped() {
        let model = RaschModel::default();
        let ds = small_dataset();
        let theta = array![80.0, 80.0, 80.0, -80.0, -80.0];

        let ll = model.value(&theta, &ds).unwrap();
        let g = model.grad(&theta, &ds).unwrap();

        assert!(ll.is_finite());
        assert_eq!(g, Array1::<f64>::zeros(5));
    }

    #[test]
    fn check_rejects_wrong_length_and_nan() {
        let model = RaschModel::default();
        let ds = small_dataset();
        assert_eq!(
            model.check(&array![0.0, 0.0], &ds),
            Err(OptError::ThetaLengthMismatch { expected: 5, actual: 2 })
        );
        assert!(matches!(
            model.negative_log_likelihood(&array![0.0, f64::NAN, 0.0, 0.0, 0.0], &ds),
            Err(OptError::InvalidThetaInput { index: 1, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // All-correct data skips the optimizer and reports zero raw
    // difficulties with a no-variation warning.
    fn constant_outcomes_skip_optimization() {
        // Arrange
        let obs: Vec<Observation> = (0..4)
            .flat_map(|i| {
                (0..3).map(move |j| Observation::new(format!("s{i}"), format!("q{j}"), true))
            })
            .collect();
        let ds = ResponseDataset::new(&obs).unwrap();
        let mut model = RaschModel::default();

        // Act
        let fit = model.fit(&ds, Some(1)).unwrap();

        // Assert
        assert_eq!(fit.raw_difficulties, Array1::<f64>::zeros(3));
        assert!(fit.outcome.is_none());
        assert_eq!(fit.warnings, vec![CalibrationWarning::NoResponseVariation { correct_rate: 1.0 }]);
        assert!(model.results.is_some());
    }

    #[test]
    // Purpose
    // -------
    // A fit on simulated data converges, keeps the best of several starts,
    // and centers abilities at zero.
    fn multi_start_fit_keeps_best_and_centers() {
        // Arrange
        let mut rng = StdRng::seed_from_u64(21);
        let sim = simulate_rasch_responses(40, 8, &mut rng).unwrap();
        let ds = ResponseDataset::new(&sim.observations).unwrap();
        let options = RaschOptions { restarts: 3, ..RaschOptions::default() };
        let mut model = RaschModel::new(options);

        // Act
        let fit = model.fit_with_rng(&ds, &mut rng).unwrap();

        // Assert
        assert_eq!(fit.starts.len(), 3);
        let best = fit.starts.iter().filter_map(|s| s.log_likelihood).fold(f64::MIN, f64::max);
        assert_eq!(fit.log_likelihood, best);
        assert_abs_diff_eq!(fit.abilities.mean().unwrap(), 0.0, epsilon = 1e-9);
        assert_eq!(fit.raw_difficulties.len(), 8);
        assert!(fit.raw_difficulties[0] < fit.raw_difficulties[7]);
    }

    #[test]
    // Purpose
    // -------
    // Exhausting the iteration budget is a warning, not an error: the best
    // iterate is still returned.
    fn iteration_budget_exhaustion_warns() {
        // Arrange
        let mut rng = StdRng::seed_from_u64(5);
        let sim = simulate_rasch_responses(30, 10, &mut rng).unwrap();
        let ds = ResponseDataset::new(&sim.observations).unwrap();
        let tols = Tolerances::new(Some(1e-12), None, Some(2)).unwrap();
        let mle_opts = MLEOptions::new(tols, LineSearcher::MoreThuente, false, None).unwrap();
        let options = RaschOptions { mle_opts, ..RaschOptions::default() };
        let mut model = RaschModel::new(options);

        // Act
        let fit = model.fit_with_rng(&ds, &mut rng).unwrap();

        // Assert
        assert!(!fit.converged);
        assert!(matches!(
            fit.warnings.as_slice(),
            [CalibrationWarning::Convergence { iterations: 2, .. }]
        ));
        assert!(fit.raw_difficulties.iter().all(|b| b.is_finite()));
    }
}
