use std::collections::BTreeMap;

/// Measured values of one variable together with their one-sigma uncertainties
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Measurement {
    pub values: Vec<f64>,
    pub sigmas: Vec<f64>,
}

/// Starting point of a fit, keyed by variable name
///
/// The fitter never keeps references into caller storage: values go in through this type and
/// the adjusted ones come back through [crate::FitResult].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FitInputs {
    measured: BTreeMap<String, Measurement>,
    unmeasured: BTreeMap<String, f64>,
}

impl FitInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_measured(&mut self, name: &str, values: &[f64], sigmas: &[f64]) -> &mut Self {
        let measurement = self.measured.entry(name.to_owned()).or_default();
        measurement.values.clear();
        measurement.values.extend_from_slice(values);
        measurement.sigmas.clear();
        measurement.sigmas.extend_from_slice(sigmas);
        self
    }

    /// Starting value of an unmeasured variable, zero if never set
    pub fn set_unmeasured(&mut self, name: &str, value: f64) -> &mut Self {
        self.unmeasured.insert(name.to_owned(), value);
        self
    }

    pub fn measured(&self, name: &str) -> Option<&Measurement> {
        self.measured.get(name)
    }

    pub fn unmeasured(&self, name: &str) -> Option<f64> {
        self.unmeasured.get(name).copied()
    }
}
