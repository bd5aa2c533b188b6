//! item_calibration — item difficulty calibration with optional Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the calibration pipeline to Python via the `_item_calibration` extension
//! module. The core turns `(student, question, correct)` observations into
//! normalized per-question difficulties in `[0, 1]` and Easy/Medium/Hard
//! categories, using either a correct-rate estimator or a Rasch (1PL) model
//! fitted by L-BFGS.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`calibration` and `optimization`) as the
//!   public crate surface.
//! - Define `#[pyclass]` wrappers and the `#[pymodule]` initializer for the
//!   `_item_calibration` Python extension.
//! - Register the `item_calibration.calibration` submodule in `sys.modules`
//!   so that dot-notation imports work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work is implemented in the inner Rust modules; this file
//!   performs only FFI glue, input validation, and error mapping.
//! - Python-visible reports mirror [`CalibrationReport`](calibration::CalibrationReport)
//!   field for field.
//!
//! Conventions
//! -----------
//! - Errors from core Rust code are propagated as rich error types internally
//!   and converted to `PyErr` values at the PyO3 boundary.
//! - Warnings cross the boundary as their display strings.
//!
//! Downstream usage
//! ----------------
//! ```no_run
//! use item_calibration::calibration::prelude::*;
//!
//! let obs = vec![
//!     Observation::new("s1", "q1", true),
//!     Observation::new("s2", "q1", false),
//!     Observation::new("s1", "q2", false),
//!     Observation::new("s2", "q2", false),
//! ];
//! let dataset = ResponseDataset::new(&obs)?;
//! let options = CalibrationOptions::with_method(MethodPreference::Simple, Some(7));
//! let outcome = calibrate(&dataset, &options)?;
//! for estimate in outcome.reports[0].sorted_by_difficulty() {
//!     println!("{} {:.3} {}", estimate.question_key, estimate.normalized_difficulty, estimate.category);
//! }
//! # Ok::<(), item_calibration::calibration::CalibrationError>(())
//! ```
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules and
//!   by the end-to-end test under `tests/`.

pub mod calibration;
pub mod optimization;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    calibration::{
        calibrate::{CalibrationReport, calibrate_observations},
        core::options::CalibrationOptions,
    },
    utils::{extract_calibration_options, extract_observations},
};

/// Python-facing entry point to the calibration pipeline.
///
/// Purpose
/// -------
/// Hold a validated [`CalibrationOptions`] built from Python keyword
/// arguments and run [`calibrate_observations`] on parallel columns.
///
/// Parameters
/// ----------
/// Constructed from Python via `Calibrator(method='auto', random_seed=None, ...)`:
/// - `method`: `Option<&str>`
///   `'auto'`, `'simple'`, `'rasch'` (or `'irt'`), or `'both'`.
/// - `random_seed`: `Option<u64>`
///   Seeds the Rasch initialization; `None` uses OS entropy.
/// - `max_iter`, `tol_grad`, `line_searcher`
///   Optimizer settings used to build the Rasch [`MLEOptions`](crate::optimization::loglik_optimizer::MLEOptions).
/// - `restarts`, `min_difficulty_range`
///   Rasch multi-start count and normalizer threshold.
/// - `sparse_below`, `dense_above`, `min_recommended_responses`
///   Density policy and sparse-item advisory threshold.
///
/// Notes
/// -----
/// - Native Rust code should call [`calibration::calibrate`] directly.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "item_calibration.calibration")]
pub struct Calibrator {
    inner: CalibrationOptions,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl Calibrator {
    #[new]
    #[pyo3(
        signature = (
            method = None,
            random_seed = None,
            max_iter = None,
            tol_grad = None,
            line_searcher = None,
            restarts = None,
            min_difficulty_range = None,
            sparse_below = None,
            dense_above = None,
            min_recommended_responses = None,
        ),
        text_signature = "(method='auto', random_seed=None, max_iter=1000, tol_grad=1e-5, \
                          line_searcher='MoreThuente', restarts=1, min_difficulty_range=0.01, \
                          sparse_below=30.0, dense_above=100.0, min_recommended_responses=50)"
    )]
    pub fn new(
        method: Option<&str>, random_seed: Option<u64>, max_iter: Option<usize>,
        tol_grad: Option<f64>, line_searcher: Option<&str>, restarts: Option<usize>,
        min_difficulty_range: Option<f64>, sparse_below: Option<f64>, dense_above: Option<f64>,
        min_recommended_responses: Option<usize>,
    ) -> PyResult<Self> {
        let inner = extract_calibration_options(
            method,
            random_seed,
            max_iter,
            tol_grad,
            line_searcher,
            restarts,
            min_difficulty_range,
            sparse_below,
            dense_above,
            min_recommended_responses,
        )?;
        Ok(Calibrator { inner })
    }

    /// Calibrate parallel `student_ids`, `question_ids`, `correct` columns.
    ///
    /// Returns one `CalibrationReport` per selected method.
    #[pyo3(text_signature = "(self, student_ids, question_ids, correct, /)")]
    pub fn calibrate<'py>(
        &self, py: Python<'py>, student_ids: &Bound<'py, PyAny>, question_ids: &Bound<'py, PyAny>,
        correct: &Bound<'py, PyAny>,
    ) -> PyResult<Vec<PyCalibrationReport>> {
        let observations = extract_observations(py, student_ids, question_ids, correct)?;
        let outcome = calibrate_observations(&observations, &self.inner)?;
        Ok(outcome.reports.into_iter().map(|inner| PyCalibrationReport { inner }).collect())
    }

    #[getter]
    pub fn method(&self) -> String {
        format!("{:?}", self.inner.preference).to_lowercase()
    }

    #[getter]
    pub fn random_seed(&self) -> Option<u64> {
        self.inner.random_seed
    }
}

/// Read-only view of one method's results.
///
/// Instances are produced by `Calibrator.calibrate` and are not created
/// directly by user code. Per-question accessors share question-index order.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "CalibrationReport", module = "item_calibration.calibration")]
pub struct PyCalibrationReport {
    pub inner: CalibrationReport,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyCalibrationReport {
    #[getter]
    pub fn method(&self) -> String {
        self.inner.method.to_string()
    }

    #[getter]
    pub fn question_keys(&self) -> Vec<String> {
        self.inner.estimates.iter().map(|e| e.question_key.clone()).collect()
    }

    #[getter]
    pub fn raw_difficulties<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner
            .estimates
            .iter()
            .map(|e| e.raw_difficulty)
            .collect::<Vec<f64>>()
            .into_pyarray_bound(py)
    }

    #[getter]
    pub fn normalized_difficulties<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.normalized_difficulties().into_pyarray_bound(py)
    }

    #[getter]
    pub fn categories(&self) -> Vec<&'static str> {
        self.inner.estimates.iter().map(|e| e.category.as_str()).collect()
    }

    #[getter]
    pub fn response_counts(&self) -> Vec<usize> {
        self.inner.estimates.iter().map(|e| e.response_count).collect()
    }

    /// `(easy, medium, hard)` counts.
    #[getter]
    pub fn distribution(&self) -> (usize, usize, usize) {
        let d = &self.inner.distribution;
        (d.easy, d.medium, d.hard)
    }

    #[getter]
    pub fn warnings(&self) -> Vec<String> {
        self.inner.warnings.iter().map(|w| w.to_string()).collect()
    }

    /// `None` for the Simple method.
    #[getter]
    pub fn converged(&self) -> Option<bool> {
        self.inner.rasch.as_ref().map(|r| r.converged)
    }

    #[getter]
    pub fn log_likelihood(&self) -> Option<f64> {
        self.inner.rasch.as_ref().map(|r| r.log_likelihood)
    }

    #[getter]
    pub fn status(&self) -> Option<String> {
        self.inner.rasch.as_ref().map(|r| r.status.clone())
    }

    /// `(student_key, ability)` pairs; empty for the Simple method.
    #[getter]
    pub fn abilities(&self) -> Vec<(String, f64)> {
        self.inner
            .rasch
            .as_ref()
            .map(|r| r.abilities.iter().map(|a| (a.student_key.clone(), a.ability)).collect())
            .unwrap_or_default()
    }

    /// Question keys ordered from easiest to hardest.
    pub fn sorted_question_keys(&self) -> Vec<String> {
        self.inner.sorted_by_difficulty().iter().map(|e| e.question_key.clone()).collect()
    }
}

/// PyO3 module initializer for the `_item_calibration` extension.
///
/// Creates the `calibration` submodule, attaches it to the parent module,
/// and registers it in `sys.modules` so `item_calibration.calibration` is
/// importable by dotted path.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _item_calibration<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let calibration_mod = PyModule::new_bound(_py, "calibration")?;
    calibration_module(_py, m, &calibration_mod)?;

    // Manually add the submodule into sys.modules to allow for dot notation.
    _py.import_bound("sys")?
        .getattr("modules")?
        .set_item("item_calibration.calibration", calibration_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn calibration_module<'py>(
    _py: Python, item_calibration: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<Calibrator>()?;
    m.add_class::<PyCalibrationReport>()?;
    item_calibration.add_submodule(m)?;
    Ok(())
}
