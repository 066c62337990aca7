use crate::error::KinematicError;
use crate::lorentz::LorentzVector;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Number of fit parameters describing one particle: `(Ek, theta, phi)`
pub const N_PARAMS: usize = 3;

/// Relative energy resolution coefficient
const EK_RESOLUTION: f64 = 0.02;
/// Exponent of the energy-resolution power law, applied on top of the linear `Ek` factor
const EK_RESOLUTION_EXPONENT: f64 = -0.36;
const THETA_SIGMA_DEG: f64 = 2.5;
const PHI_SIGMA_FALLBACK_DEG: f64 = 1.0;
/// `phi` resolution follows `theta_sigma / sin(theta)` strictly inside this polar range
const PHI_SIGMA_THETA_RANGE_DEG: (f64, f64) = (20.0, 160.0);

/// Kinematic state of one fit participant
///
/// The rest mass is not stored: the same parameterization serves photons and protons, so the
/// caller supplies the mass whenever a 4-momentum is built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FitParticle {
    pub ek: f64,
    /// Polar angle, a smeared measurement near the beam axis may lie outside `[0, π]`
    pub theta: f64,
    pub phi: f64,
    pub ek_sigma: f64,
    pub theta_sigma: f64,
    pub phi_sigma: f64,
}

impl FitParticle {
    pub fn new(ek: f64, theta: f64, phi: f64) -> Self {
        Self {
            ek,
            theta,
            phi,
            ..Self::default()
        }
    }

    /// Decompose a 4-momentum into `(Ek, theta, phi)` for a particle of the given mass
    pub fn from_four_momentum(p4: &LorentzVector, mass: f64) -> Self {
        let mut particle = Self::default();
        particle.assign_from_truth(p4, mass);
        particle
    }

    /// Overwrite the values with the decomposition of `p4`, sigmas are left as they are
    pub fn assign_from_truth(&mut self, p4: &LorentzVector, mass: f64) {
        self.ek = p4.e() - mass;
        self.theta = p4.theta();
        self.phi = p4.phi();
    }

    pub fn values(&self) -> [f64; N_PARAMS] {
        [self.ek, self.theta, self.phi]
    }

    pub fn sigmas(&self) -> [f64; N_PARAMS] {
        [self.ek_sigma, self.theta_sigma, self.phi_sigma]
    }

    /// Replace the values with a parameter list in `(Ek, theta, phi)` order
    pub fn set_values(&mut self, params: &[f64]) -> Result<(), KinematicError> {
        let [ek, theta, phi] = check_params(params)?;
        self.ek = ek;
        self.theta = theta;
        self.phi = phi;
        Ok(())
    }

    pub fn to_four_momentum(&self, mass: f64) -> Result<LorentzVector, KinematicError> {
        four_momentum(&self.values(), mass)
    }

    /// Set the sigmas from the detector resolution at the current values
    ///
    /// Depends on `Ek` and `theta` only and writes nothing but the three sigmas.
    pub fn estimate_uncertainties(&mut self) {
        self.ek_sigma = if self.ek > 0.0 {
            EK_RESOLUTION * self.ek * self.ek.powf(EK_RESOLUTION_EXPONENT)
        } else {
            0.0
        };
        self.theta_sigma = THETA_SIGMA_DEG.to_radians();
        let (theta_min, theta_max) = PHI_SIGMA_THETA_RANGE_DEG;
        let in_band = self.theta > theta_min.to_radians() && self.theta < theta_max.to_radians();
        self.phi_sigma = if in_band {
            self.theta_sigma / self.theta.sin()
        } else {
            PHI_SIGMA_FALLBACK_DEG.to_radians()
        };
    }

    pub fn clear_uncertainties(&mut self) {
        self.ek_sigma = 0.0;
        self.theta_sigma = 0.0;
        self.phi_sigma = 0.0;
    }

    /// Fold the angles back to `theta` in `[0, π]` and `phi` in `(-π, π]`
    pub fn normalize_angles(&mut self) {
        self.theta = self.theta.rem_euclid(2.0 * PI);
        if self.theta > PI {
            self.theta = 2.0 * PI - self.theta;
            self.phi += PI;
        }
        self.phi = wrap_phi(self.phi);
    }
}

fn wrap_phi(phi: f64) -> f64 {
    let wrapped = (phi + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped == -PI { PI } else { wrapped }
}

fn check_params(params: &[f64]) -> Result<[f64; N_PARAMS], KinematicError> {
    let params: [f64; N_PARAMS] =
        params
            .try_into()
            .map_err(|_| KinematicError::WrongParameterCount {
                expected: N_PARAMS,
                actual: params.len(),
            })?;
    for (value, name) in params.iter().zip(["Ek", "theta", "phi"]) {
        if !value.is_finite() {
            return Err(KinematicError::NonFinite(name));
        }
    }
    Ok(params)
}

/// 4-momentum of a particle with parameters `(Ek, theta, phi)` and rest mass `mass`
///
/// Fails if the total energy is below the rest mass instead of producing a NaN momentum.
pub fn four_momentum(params: &[f64], mass: f64) -> Result<LorentzVector, KinematicError> {
    let [ek, theta, phi] = check_params(params)?;
    let energy = ek + mass;
    if energy < mass {
        return Err(KinematicError::BelowMassThreshold { ek, mass });
    }
    let p = (energy * energy - mass * mass).max(0.0).sqrt();
    Ok(LorentzVector::from_mag_theta_phi(p, theta, phi, energy))
}
