//! Python argument extraction helpers for the `python-bindings` feature.
//!
//! Converts array-likes (numpy arrays, pandas Series, plain sequences) and
//! optional keyword arguments into the crate's Rust types. Validation errors
//! surface as Python `ValueError` / `TypeError`.
#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::PyAny,
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

#[cfg(feature = "python-bindings")]
use crate::{
    calibration::{
        core::{
            data::Observation,
            options::{CalibrationOptions, DensityPolicy, MethodPreference, RaschOptions},
        },
        errors::CalibrationError,
    },
    optimization::loglik_optimizer::{
        LineSearcher, MLEOptions, Tolerances,
        traits::{DEFAULT_MAX_ITER, DEFAULT_TOL_GRAD},
    },
};

/// Accept a 1-D bool ndarray, a pandas Series (via `to_numpy`), or a
/// sequence of Python bools.
#[cfg(feature = "python-bindings")]
pub fn extract_bool_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, bool>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<bool>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<bool>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<bool> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D boolean numpy.ndarray, pandas.Series, or sequence")
    })?;
    Ok(vec.into_pyarray_bound(py).readonly())
}

/// Accept a pandas Series (via `tolist`) or any sequence of `str`.
#[cfg(feature = "python-bindings")]
pub fn extract_keys<'py>(raw_data: &Bound<'py, PyAny>, name: &str) -> PyResult<Vec<String>> {
    if let Ok(keys) = raw_data.extract::<Vec<String>>() {
        return Ok(keys);
    }
    raw_data
        .call_method0("tolist")
        .and_then(|obj| obj.extract::<Vec<String>>())
        .map_err(|_| PyTypeError::new_err(format!("{name} must be a sequence of str")))
}

/// Zip three parallel columns into observations.
///
/// Empty identifiers are rejected here because the dataset layer treats keys
/// as opaque.
#[cfg(feature = "python-bindings")]
pub fn extract_observations<'py>(
    py: Python<'py>, student_ids: &Bound<'py, PyAny>, question_ids: &Bound<'py, PyAny>,
    correct: &Bound<'py, PyAny>,
) -> PyResult<Vec<Observation>> {
    let students = extract_keys(student_ids, "student_ids")?;
    let questions = extract_keys(question_ids, "question_ids")?;
    let correct_arr = extract_bool_array(py, correct)?;
    let outcomes = correct_arr
        .as_slice()
        .map_err(|_| PyValueError::new_err("correct must be a 1-D contiguous boolean array"))?;

    if students.len() != questions.len() || students.len() != outcomes.len() {
        return Err(PyValueError::new_err(format!(
            "column lengths differ: student_ids={}, question_ids={}, correct={}",
            students.len(),
            questions.len(),
            outcomes.len()
        )));
    }
    let blank = students.iter().zip(questions.iter()).position(|(s, q)| s.is_empty() || q.is_empty());
    if let Some(k) = blank {
        return Err(PyValueError::new_err(format!("empty identifier in row {k}")));
    }

    Ok(students
        .into_iter()
        .zip(questions)
        .zip(outcomes.iter())
        .map(|((s, q), &y)| Observation::new(s, q, y))
        .collect())
}

#[cfg(feature = "python-bindings")]
fn extract_mle_opts(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>,
) -> PyResult<MLEOptions> {
    use std::str::FromStr;

    let tol_grad = tol_grad.or(Some(DEFAULT_TOL_GRAD));
    let max_iter = max_iter.or(Some(DEFAULT_MAX_ITER));

    // OptResult<_> -> CalibrationError -> PyErr
    let tols = Tolerances::new(tol_grad, tol_cost, max_iter).map_err(CalibrationError::from)?;
    let ls = match line_searcher {
        Some(name) => LineSearcher::from_str(name).map_err(CalibrationError::from)?,
        None => LineSearcher::MoreThuente,
    };
    let opts = MLEOptions::new(tols, ls, false, lbfgs_mem).map_err(CalibrationError::from)?;

    Ok(opts)
}

/// Build [`CalibrationOptions`] from keyword arguments, filling defaults for
/// everything left as `None`.
#[cfg(feature = "python-bindings")]
pub fn extract_calibration_options(
    method: Option<&str>, random_seed: Option<u64>, max_iter: Option<usize>,
    tol_grad: Option<f64>, line_searcher: Option<&str>, restarts: Option<usize>,
    min_difficulty_range: Option<f64>, sparse_below: Option<f64>, dense_above: Option<f64>,
    min_recommended_responses: Option<usize>,
) -> PyResult<CalibrationOptions> {
    use std::str::FromStr;

    let preference = match method {
        Some(name) => MethodPreference::from_str(name)?,
        None => MethodPreference::Auto,
    };

    let defaults = RaschOptions::default();
    let mle_opts = extract_mle_opts(tol_grad, None, max_iter, line_searcher, None)?;
    let rasch = RaschOptions::new(
        mle_opts,
        restarts.unwrap_or(defaults.restarts),
        defaults.init_scale,
        min_difficulty_range.unwrap_or(defaults.min_difficulty_range),
        defaults.center_abilities,
    )?;

    let density_defaults = DensityPolicy::default();
    let density = DensityPolicy::new(
        sparse_below.unwrap_or(density_defaults.sparse_below),
        dense_above.unwrap_or(density_defaults.dense_above),
    )?;

    let base = CalibrationOptions::default();
    Ok(CalibrationOptions::new(
        preference,
        rasch,
        density,
        random_seed,
        min_recommended_responses.unwrap_or(base.min_recommended_responses),
    ))
}
