//! numerical_stability — numerically robust logistic and likelihood helpers.
//!
//! Purpose
//! -------
//! Collect numerically stable scalar transforms used by the response model
//! so the rest of the optimization and calibration layers can assume
//! well-conditioned `f64` arithmetic. This module centralizes the
//! probability clipping margin and the logistic evaluation strategy.
//!
//! Key behaviors
//! -------------
//! - Provide a stable logistic (`safe_logistic`) that never overflows `exp`.
//! - Clip probabilities into `[PROB_EPS, 1 − PROB_EPS]` (`clip_probability`)
//!   before logarithms are taken.
//! - Evaluate the clipped Bernoulli log-likelihood and its derivative with
//!   respect to the logit in a single call (`bernoulli_loglik`).
//!
//! Invariants & assumptions
//! ------------------------
//! - All public transforms assume finite `f64` inputs; shape and index
//!   validation is enforced in the calibration layer, not here.
//! - `bernoulli_loglik` always returns a finite value bounded below by
//!   `ln(PROB_EPS)`.
//!
//! Conventions
//! -----------
//! - This module never logs, performs I/O, or touches global state; it is
//!   pure numerical helpers suitable for use inside tight inner loops.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] cover agreement with naïve formulas on
//!   safe grids, saturation behavior, and finite-difference checks of the
//!   logit derivative.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{PROB_EPS, bernoulli_loglik, clip_probability, safe_logistic};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use item_calibration::optimization::numerical_stability::prelude::*;
//
// to import the main numerical-stability surface in a single line.

pub mod prelude {
    pub use super::transformations::{
        PROB_EPS, bernoulli_loglik, clip_probability, safe_logistic,
    };
}
