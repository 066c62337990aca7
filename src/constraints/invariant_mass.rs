use crate::constraints::constraint::*;
use crate::particle::ParticleType;

macro_const! {
    const DOC: &str = r"
Invariant mass of the final-state photons

All participants are photons, the residual is
$$
r = \left|\sum_i P_{\gamma,i}\right| - M_\mathrm{target},
$$
where $|P|$ is the Minkowski norm. Cannot be combined with the vertex constraint, which
already contains the same mass condition.

- Number of participants: at least **1**
- Number of residuals: **1**
";
}

#[doc = DOC!()]
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct InvariantMassConstraint {
    pub target_mass: f64,
}

impl InvariantMassConstraint {
    pub const NAME: &'static str = "RequireIM";

    pub fn new(target_mass: f64) -> Self {
        Self { target_mass }
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl ConstraintTrait for InvariantMassConstraint {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn size(&self) -> usize {
        1
    }

    fn residuals(&self, params: &[&[f64]]) -> Result<Vec<f64>, KinematicError> {
        if params.is_empty() {
            return Err(KinematicError::TooFewParticles {
                minimum: 1,
                actual: 0,
            });
        }
        let sum = sum_four_momenta(params, ParticleType::Photon.mass())?;
        Ok(vec![sum.mass() - self.target_mass])
    }
}
