use crate::error::ConfigError;
use crate::nl_fit::FitSettings;
use crate::particle::ParticleType;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Mass constraint applied to the photons on top of energy-momentum balance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ConstraintMode {
    EnergyMomentumOnly,
    /// Photons must form [HarnessConfig::target_mass]
    InvariantMass,
    /// As [ConstraintMode::InvariantMass] with the photon angles corrected for a free vertex
    /// position along the beam
    Vertex,
}

/// Configuration of [crate::FitHarness]
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct HarnessConfig {
    /// Number of final-state photons of the fitted hypothesis
    #[serde(default = "HarnessConfig::default_n_photons")]
    pub n_photons: usize,
    #[serde(default)]
    pub include_im_constraint: bool,
    #[serde(default)]
    pub include_vertex_fit: bool,
    /// Invariant mass of the photons used by the mass constraints, MeV
    #[serde(default = "HarnessConfig::default_target_mass")]
    pub target_mass: f64,
    /// Upper edge of energy histograms, MeV
    #[serde(default = "HarnessConfig::default_energy_scale")]
    pub energy_scale: f64,
    #[serde(default)]
    pub fit: FitSettings,
}

impl HarnessConfig {
    #[inline]
    pub fn default_n_photons() -> usize {
        2
    }

    #[inline]
    pub fn default_target_mass() -> f64 {
        ParticleType::Pi0.mass()
    }

    #[inline]
    pub fn default_energy_scale() -> f64 {
        1000.0
    }

    pub fn validate(&self) -> Result<ConstraintMode, ConfigError> {
        if self.n_photons == 0 {
            return Err(ConfigError::NoPhotons);
        }
        if !(self.target_mass.is_finite() && self.target_mass > 0.0) {
            return Err(ConfigError::InvalidTargetMass(self.target_mass));
        }
        if !(self.energy_scale.is_finite() && self.energy_scale > 0.0) {
            return Err(ConfigError::InvalidEnergyScale(self.energy_scale));
        }
        if self.fit.max_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        match (self.include_im_constraint, self.include_vertex_fit) {
            (true, true) => Err(ConfigError::ExclusiveMassConstraints),
            (true, false) => Ok(ConstraintMode::InvariantMass),
            (false, true) => Ok(ConstraintMode::Vertex),
            (false, false) => Ok(ConstraintMode::EnergyMomentumOnly),
        }
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            n_photons: Self::default_n_photons(),
            include_im_constraint: false,
            include_vertex_fit: false,
            target_mass: Self::default_target_mass(),
            energy_scale: Self::default_energy_scale(),
            fit: FitSettings::default(),
        }
    }
}
