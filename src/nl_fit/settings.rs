use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Iteration control of [crate::KinematicFitter]
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FitSettings {
    /// Fit gives up with [crate::FitStatus::NoConvergence] after this many iterations
    #[serde(default = "FitSettings::default_max_iterations")]
    pub max_iterations: u32,
    /// Largest absolute constraint residual accepted as converged
    #[serde(default = "FitSettings::default_constraint_accuracy")]
    pub constraint_accuracy: f64,
    /// Largest chi-square change between iterations accepted as converged
    #[serde(default = "FitSettings::default_chi2_accuracy")]
    pub chi2_accuracy: f64,
    /// Numerical-derivative step in units of the variable's sigma, or of `max(|value|, 1)` for
    /// unmeasured variables
    #[serde(default = "FitSettings::default_derivative_step")]
    pub derivative_step: f64,
}

impl FitSettings {
    #[inline]
    pub fn default_max_iterations() -> u32 {
        50
    }

    #[inline]
    pub fn default_constraint_accuracy() -> f64 {
        1e-6
    }

    #[inline]
    pub fn default_chi2_accuracy() -> f64 {
        1e-5
    }

    #[inline]
    pub fn default_derivative_step() -> f64 {
        1e-3
    }
}

impl Default for FitSettings {
    fn default() -> Self {
        Self {
            max_iterations: Self::default_max_iterations(),
            constraint_accuracy: Self::default_constraint_accuracy(),
            chi2_accuracy: Self::default_chi2_accuracy(),
            derivative_step: Self::default_derivative_step(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let settings: FitSettings = serde_json::from_str(r#"{"max_iterations": 20}"#).unwrap();
        assert_eq!(settings.max_iterations, 20);
        assert_eq!(
            settings.constraint_accuracy,
            FitSettings::default_constraint_accuracy()
        );
        assert_eq!(
            settings.derivative_step,
            FitSettings::default_derivative_step()
        );
    }
}
