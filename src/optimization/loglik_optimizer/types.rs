//! Numeric aliases shared by the optimizer modules.
//!
//! `Theta` and `Grad` are `ndarray` vectors of `f64`; for the Rasch model
//! `Theta` is the stacked vector `(abilities, difficulties)`. `Cost` is the
//! negated log-likelihood that argmin minimizes.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::Array1;
use std::collections::HashMap;

/// Parameter vector `θ`.
pub type Theta = Array1<f64>;

/// Gradient, same length as [`Theta`].
pub type Grad = Array1<f64>;

/// `c(θ) = −ℓ(θ)`.
pub type Cost = f64;

/// argmin's evaluation counters, e.g. `"cost_count"`.
pub type FnEvalMap = HashMap<String, u64>;

/// L-BFGS history size used when `MLEOptions::lbfgs_mem` is `None`.
pub const DEFAULT_LBFGS_MEM: usize = 7;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS over [`Theta`] with line search `L`.
pub type Lbfgs<L> = LBFGS<L, Theta, Grad, Cost>;
