//! Min-max normalization of raw difficulties onto `[0, 1]`.
//!
//! Purpose
//! -------
//! Map raw difficulty values (correct-rate complements or Rasch logits) onto
//! a bounded, comparable scale. Min-max rescaling is shift- and
//! scale-invariant, which is what removes the Rasch model's additive
//! indeterminacy from the published output.
//!
//! Key behaviors
//! -------------
//! - `max − min > threshold` ⇒ `normalized = (raw − min) / (max − min)`, so
//!   the minimum maps to exactly 0 and the maximum to exactly 1.
//! - Otherwise every item gets the constant 0.5 and a
//!   [`CalibrationWarning::LowVariation`] is returned alongside.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs must be finite; the first NaN/±inf is rejected with
//!   [`CalibrationError::NonFiniteDifficulty`].
//! - Outputs always lie in `[0, 1]`.
use crate::calibration::errors::{CalibrationError, CalibrationResult, CalibrationWarning};
use ndarray::Array1;

/// Range threshold used on the correct-rate path: any spread at all rescales.
pub const SIMPLE_MIN_RANGE: f64 = 0.0;

/// Normalized value assigned to every item when the raw range is degenerate.
pub const DEGENERATE_NORMALIZED: f64 = 0.5;

/// Normalized difficulties plus the optional low-variation flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub values: Array1<f64>,
    pub warning: Option<CalibrationWarning>,
}

/// Min-max normalize `raw` with degeneracy threshold `min_range`.
///
/// Errors
/// ------
/// - `CalibrationError::NonFiniteDifficulty { index, value }`
///   Returned for the first non-finite raw value.
/// - `CalibrationError::InvalidOption`
///   Returned when `min_range` is negative or non-finite.
pub fn normalize_difficulties(raw: &Array1<f64>, min_range: f64) -> CalibrationResult<Normalized> {
    if !min_range.is_finite() || min_range < 0.0 {
        return Err(CalibrationError::InvalidOption {
            name: "min_difficulty_range",
            value: min_range.to_string(),
            reason: "must be finite and non-negative",
        });
    }
    if let Some((index, &value)) = raw.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(CalibrationError::NonFiniteDifficulty { index, value });
    }

    let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if raw.is_empty() || range <= min_range {
        return Ok(Normalized {
            values: Array1::from_elem(raw.len(), DEGENERATE_NORMALIZED),
            warning: Some(CalibrationWarning::LowVariation {
                range: if raw.is_empty() { 0.0 } else { range },
                threshold: min_range,
            }),
        });
    }

    // (max - min) / range is exactly 1.0, so the endpoints survive the clamp untouched
    let values = raw.mapv(|x| ((x - min) / range).clamp(0.0, 1.0));
    Ok(Normalized { values, warning: None })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Min-max rescale maps min → 0, max → 1, and interior points linearly.
    fn rescales_into_unit_interval() {
        // Arrange
        let raw = array![-1.0, 0.5, 2.0];

        // Act
        let out = normalize_difficulties(&raw, 0.01).unwrap();

        // Assert
        assert!(out.warning.is_none());
        assert_eq!(out.values[0], 0.0);
        assert_eq!(out.values[2], 1.0);
        assert_abs_diff_eq!(out.values[1], 0.5, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Normalizing already-normalized output is the identity.
    fn normalization_is_idempotent() {
        let raw = array![3.2, -0.7, 1.1, 0.4, 2.9];
        let once = normalize_difficulties(&raw, 0.01).unwrap().values;
        let twice = normalize_difficulties(&once, 0.01).unwrap().values;
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // A range at or below the threshold yields constant 0.5 and a warning.
    //
    // Given
    // -----
    // - Rasch-path threshold 0.01 with raw spread 0.005.
    // - Simple-path threshold 0.0 with identical raw values.
    fn degenerate_range_yields_half_and_warning() {
        let near = normalize_difficulties(&array![1.0, 1.005, 1.002], 0.01).unwrap();
        assert_eq!(near.values, array![0.5, 0.5, 0.5]);
        assert!(matches!(
            near.warning,
            Some(CalibrationWarning::LowVariation { threshold, .. }) if threshold == 0.01
        ));

        let flat = normalize_difficulties(&array![0.4, 0.4], SIMPLE_MIN_RANGE).unwrap();
        assert_eq!(flat.values, array![0.5, 0.5]);
        assert!(flat.warning.is_some());

        // Any positive spread rescales on the correct-rate path.
        let tiny = normalize_difficulties(&array![0.4, 0.41], SIMPLE_MIN_RANGE).unwrap();
        assert!(tiny.warning.is_none());
        assert_eq!(tiny.values, array![0.0, 1.0]);
    }

    #[test]
    fn single_item_is_degenerate() {
        let out = normalize_difficulties(&array![0.8], SIMPLE_MIN_RANGE).unwrap();
        assert_eq!(out.values, array![0.5]);
        assert!(out.warning.is_some());
    }

    #[test]
    fn rejects_non_finite_input_and_bad_threshold() {
        assert_eq!(
            normalize_difficulties(&array![0.1, f64::INFINITY], 0.0),
            Err(CalibrationError::NonFiniteDifficulty { index: 1, value: f64::INFINITY })
        );
        assert!(matches!(
            normalize_difficulties(&array![0.1, 0.2], -1.0),
            Err(CalibrationError::InvalidOption { name: "min_difficulty_range", .. })
        ));
    }
}
