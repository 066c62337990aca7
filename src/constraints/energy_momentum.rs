use crate::constraints::constraint::*;
use crate::particle::ParticleType;

macro_const! {
    const DOC: &str = r"
Energy-momentum balance of $\gamma\,p \to p\,n\gamma$

The target nucleon is at rest, the first participant is the beam photon, the second one is the
outgoing proton and all the remaining participants are outgoing photons:
$$
\vec r = \left(P_\mathrm{target} + P_\mathrm{beam}\right)
    - \left(P_\mathrm{proton} + \sum_i P_{\gamma,i}\right),
$$
with the four residual components ordered as $(p_x, p_y, p_z, E)$.

- Number of participants: at least **2**
- Number of residuals: **4**
";
}

#[doc = DOC!()]
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct EnergyMomentumBalance {
    #[serde(default = "EnergyMomentumBalance::default_target_mass")]
    pub target_mass: f64,
    #[serde(default = "EnergyMomentumBalance::default_recoil_mass")]
    pub recoil_mass: f64,
}

impl EnergyMomentumBalance {
    pub const NAME: &'static str = "EnergyMomentumBalance";

    pub fn new(target_mass: f64, recoil_mass: f64) -> Self {
        Self {
            target_mass,
            recoil_mass,
        }
    }

    #[inline]
    pub fn default_target_mass() -> f64 {
        ParticleType::Proton.mass()
    }

    #[inline]
    pub fn default_recoil_mass() -> f64 {
        ParticleType::Proton.mass()
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl Default for EnergyMomentumBalance {
    fn default() -> Self {
        Self::new(Self::default_target_mass(), Self::default_recoil_mass())
    }
}

impl ConstraintTrait for EnergyMomentumBalance {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn size(&self) -> usize {
        4
    }

    fn residuals(&self, params: &[&[f64]]) -> Result<Vec<f64>, KinematicError> {
        let [beam, recoil, photons @ ..] = params else {
            return Err(KinematicError::TooFewParticles {
                minimum: 2,
                actual: params.len(),
            });
        };
        let mut diff = LorentzVector::at_rest(self.target_mass)
            + four_momentum(beam, ParticleType::Photon.mass())?;
        diff -= four_momentum(recoil, self.recoil_mass)?;
        diff -= sum_four_momenta(photons, ParticleType::Photon.mass())?;
        Ok(diff.to_array().to_vec())
    }
}
