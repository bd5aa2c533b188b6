//! Method selector — which estimators to run for a given response density.
//!
//! A pure function of `responses_per_question`, the caller's
//! [`MethodPreference`], and the [`DensityPolicy`] bands:
//!
//! | band     | `Auto`          | explicit choice                      |
//! |----------|-----------------|--------------------------------------|
//! | sparse   | Simple          | honored; Rasch adds a warning        |
//! | moderate | Simple + Rasch  | honored                              |
//! | dense    | Rasch           | honored                              |
use crate::calibration::{
    core::options::{DensityPolicy, MethodPreference},
    errors::CalibrationWarning,
};
use serde::Serialize;

/// An estimation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EstimationMethod {
    Simple,
    Rasch,
}

impl std::fmt::Display for EstimationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EstimationMethod::Simple => f.write_str("simple"),
            EstimationMethod::Rasch => f.write_str("rasch"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DensityBand {
    Sparse,
    Moderate,
    Dense,
}

impl DensityPolicy {
    pub fn band(&self, responses_per_question: f64) -> DensityBand {
        if responses_per_question < self.sparse_below {
            DensityBand::Sparse
        } else if responses_per_question > self.dense_above {
            DensityBand::Dense
        } else {
            DensityBand::Moderate
        }
    }
}

/// Outcome of the selection policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodSelection {
    pub responses_per_question: f64,
    pub band: DensityBand,
    /// Methods to run, Simple first when both are selected.
    pub methods: Vec<EstimationMethod>,
    pub warnings: Vec<CalibrationWarning>,
}

impl MethodSelection {
    pub fn includes(&self, method: EstimationMethod) -> bool {
        self.methods.contains(&method)
    }
}

/// Apply the selection policy.
///
/// An explicit request for Rasch (`Rasch` or `Both`) in the sparse band is
/// honored but flagged with [`CalibrationWarning::RaschBelowDensity`].
pub fn select_methods(
    responses_per_question: f64, preference: MethodPreference, policy: &DensityPolicy,
) -> MethodSelection {
    use EstimationMethod::{Rasch, Simple};

    let band = policy.band(responses_per_question);
    let methods = match (preference, band) {
        (MethodPreference::Auto, DensityBand::Sparse) => vec![Simple],
        (MethodPreference::Auto, DensityBand::Moderate) => vec![Simple, Rasch],
        (MethodPreference::Auto, DensityBand::Dense) => vec![Rasch],
        (MethodPreference::Simple, _) => vec![Simple],
        (MethodPreference::Rasch, _) => vec![Rasch],
        (MethodPreference::Both, _) => vec![Simple, Rasch],
    };

    let mut warnings = Vec::new();
    if band == DensityBand::Sparse && preference != MethodPreference::Auto && methods.contains(&Rasch)
    {
        warnings.push(CalibrationWarning::RaschBelowDensity {
            responses_per_question,
            threshold: policy.sparse_below,
        });
    }

    MethodSelection { responses_per_question, band, methods, warnings }
}
