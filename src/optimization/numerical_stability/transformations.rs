//! Numerical stability utilities.
//!
//! Provides safe implementations of the logistic response function and the
//! Bernoulli log-likelihood that are prone to overflow/underflow in naïve
//! form. The functions here follow guarded strategies similar to those
//! in major ML libraries (e.g. PyTorch, TensorFlow), branching on the sign
//! of the input so `exp` is only ever evaluated on non-positive arguments.
//!
//! # Provided items
//! - [`PROB_EPS`]: clipping margin for probabilities (1e-10).
//! - [`safe_logistic(x)`]: stable `1 / (1 + exp(-x))`, mapping ℝ → (0, 1).
//! - [`clip_probability(p)`]: clamp `p` into `[PROB_EPS, 1 − PROB_EPS]`.
//! - [`bernoulli_loglik(z, correct)`]: `y·ln p + (1−y)·ln(1−p)` evaluated on the
//!   clipped probability, together with its derivative w.r.t. the logit.

/// Clipping margin applied to response probabilities before taking logs.
///
/// A saturated logistic (`p == 0` or `p == 1` in `f64`) would make one of
/// `ln p` / `ln(1 − p)` equal to `-∞`; clipping keeps every per-observation
/// log-likelihood term above `ln(1e-10) ≈ -23.03`.
pub const PROB_EPS: f64 = 1e-10;

/// Numerically stable logistic function `σ(x) = 1 / (1 + exp(-x))`.
///
/// For `x ≥ 0` the textbook form is evaluated directly; for `x < 0` the
/// algebraically equivalent `exp(x) / (1 + exp(x))` is used so that `exp`
/// never overflows.
///
/// # Parameters
/// - `x`: real input (logit).
///
/// # Returns
/// - `σ(x)` in `[0, 1]`; exactly `0.5` at `x = 0`.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Clamp a probability into `[PROB_EPS, 1 − PROB_EPS]`.
pub fn clip_probability(p: f64) -> f64 {
    p.clamp(PROB_EPS, 1.0 - PROB_EPS)
}

/// Clipped Bernoulli log-likelihood at logit `z` and its logit derivative.
///
/// Computes `p = σ(z)`, clips it with [`clip_probability`], and returns
/// `(ℓ, ∂ℓ/∂z)` where `ℓ = y·ln p + (1−y)·ln(1−p)`.
///
/// When `p` falls inside the clipping band the derivative is the familiar
/// `y − p`. Once `p` is clipped, `ℓ` is constant in `z`, so the derivative
/// returned is exactly `0.0`; this keeps the analytic gradient consistent
/// with the clipped objective the optimizer actually sees.
///
/// # Parameters
/// - `z`: logit, typically `θ − b`.
/// - `correct`: observed outcome.
pub fn bernoulli_loglik(z: f64, correct: bool) -> (f64, f64) {
    let p = safe_logistic(z);
    let clipped = clip_probability(p);
    let y = if correct { 1.0 } else { 0.0 };
    let value = if correct { clipped.ln() } else { (1.0 - clipped).ln() };
    let deriv = if clipped == p { y - p } else { 0.0 };
    (value, deriv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    // Purpose
    // -------
    // The stable logistic must agree with the naïve formula on a safe grid and
    // hit 0.5 exactly at zero.
    fn safe_logistic_matches_naive_formula_on_safe_grid() {
        for i in -40..=40 {
            let x = i as f64 * 0.25;
            let naive = 1.0 / (1.0 + (-x).exp());
            assert_abs_diff_eq!(safe_logistic(x), naive, epsilon = 1e-14);
        }
        assert_eq!(safe_logistic(0.0), 0.5);
    }

    #[test]
    // Purpose
    // -------
    // Extreme logits must not produce NaN; they saturate into [0, 1].
    fn safe_logistic_saturates_without_nan() {
        let lo = safe_logistic(-1e4);
        let hi = safe_logistic(1e4);
        assert!(lo.is_finite() && lo >= 0.0);
        assert!(hi.is_finite() && hi <= 1.0);
        assert_eq!(hi, 1.0);
    }

    #[test]
    // Purpose
    // -------
    // Saturated probabilities are clipped, so the log-likelihood stays finite
    // and the derivative vanishes.
    //
    // Given
    // -----
    // - A logit of 50, where σ(50) rounds to 1.0 in f64.
    //
    // Expect
    // ------
    // - An incorrect response yields ln(1e-10) and zero derivative.
    fn bernoulli_loglik_clips_saturated_probabilities() {
        let (value, deriv) = bernoulli_loglik(50.0, false);
        assert_abs_diff_eq!(value, PROB_EPS.ln(), epsilon = 1e-6);
        assert_eq!(deriv, 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Inside the clipping band the derivative must match a central finite
    // difference of the value.
    fn bernoulli_loglik_derivative_matches_finite_difference() {
        let h = 1e-6;
        for &(z, y) in &[(0.3, true), (-1.2, false), (2.5, true), (-0.7, true)] {
            let (_, analytic) = bernoulli_loglik(z, y);
            let (up, _) = bernoulli_loglik(z + h, y);
            let (down, _) = bernoulli_loglik(z - h, y);
            let numeric = (up - down) / (2.0 * h);
            assert_abs_diff_eq!(analytic, numeric, epsilon = 1e-6);
        }
    }
}
