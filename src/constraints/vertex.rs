use crate::constraints::constraint::*;
use crate::particle::{N_PARAMS, ParticleType};

macro_const! {
    const DOC: &str = r"
Invariant mass of the final-state photons created at an unknown vertex on the beam axis

Photon directions are measured from the detector center, but the photons may come from
$(0, 0, v_z)$ instead, $v_z$ being positive downstream. For a photon hitting a spherical
calorimeter of radius $R$ under the polar angle $\theta$, the polar angle seen from the shifted
vertex is
$$
\tan\theta' = \frac{R \sin\theta}{R \cos\theta - v_z}.
$$
The residual is the invariant mass of the corrected photons minus the target mass. The last
participant is the scalar unmeasured variable $v_z$, every other participant is a photon.

- Number of participants: at least **2** (photons and $v_z$)
- Number of residuals: **1**
";
}

#[doc = DOC!()]
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct VertexConstraint {
    pub target_mass: f64,
    #[serde(default = "VertexConstraint::default_radius")]
    pub radius: f64,
}

impl VertexConstraint {
    pub const NAME: &'static str = "VertexConstraint";

    /// Name of the vertex-position variable
    pub const VERTEX_VARIABLE: &'static str = "v_z";

    pub fn new(target_mass: f64) -> Self {
        Self::with_radius(target_mass, Self::default_radius())
    }

    pub fn with_radius(target_mass: f64, radius: f64) -> Self {
        Self {
            target_mass,
            radius,
        }
    }

    /// Crystal-ball inner radius, 10 inch in cm
    #[inline]
    pub fn default_radius() -> f64 {
        25.4
    }

    pub const fn doc() -> &'static str {
        DOC
    }

    /// Polar angle of a photon seen from `(0, 0, v_z)` instead of the origin
    pub fn corrected_theta(&self, theta: f64, v_z: f64) -> f64 {
        let (sin_theta, cos_theta) = theta.sin_cos();
        f64::atan2(self.radius * sin_theta, self.radius * cos_theta - v_z)
    }
}

impl ConstraintTrait for VertexConstraint {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn size(&self) -> usize {
        1
    }

    fn residuals(&self, params: &[&[f64]]) -> Result<Vec<f64>, KinematicError> {
        let [photons @ .., vertex] = params else {
            return Err(KinematicError::TooFewParticles {
                minimum: 2,
                actual: 0,
            });
        };
        if photons.is_empty() {
            return Err(KinematicError::TooFewParticles {
                minimum: 2,
                actual: params.len(),
            });
        }
        let &[v_z] = *vertex else {
            return Err(KinematicError::WrongParameterCount {
                expected: 1,
                actual: vertex.len(),
            });
        };

        let mut sum = LorentzVector::zero();
        for photon in photons {
            let mut corrected: [f64; N_PARAMS] =
                (*photon)
                    .try_into()
                    .map_err(|_| KinematicError::WrongParameterCount {
                        expected: N_PARAMS,
                        actual: photon.len(),
                    })?;
            corrected[1] = self.corrected_theta(corrected[1], v_z);
            sum += four_momentum(&corrected, ParticleType::Photon.mass())?;
        }
        Ok(vec![sum.mass() - self.target_mass])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::InvariantMassConstraint;

    use approx::assert_abs_diff_eq;

    #[test]
    fn zero_offset_keeps_angle() {
        let constraint = VertexConstraint::new(135.0);
        for i in 1..100 {
            let theta = std::f64::consts::PI * (i as f64) / 100.0;
            assert_abs_diff_eq!(
                constraint.corrected_theta(theta, 0.0),
                theta,
                epsilon = 1e-14
            );
        }
    }

    #[test]
    fn downstream_vertex_widens_angle() {
        let constraint = VertexConstraint::new(135.0);
        let theta = 1.0;
        assert!(constraint.corrected_theta(theta, 2.0) > theta);
        assert!(constraint.corrected_theta(theta, -2.0) < theta);
        // a photon at 90° seen from v_z = R sits at 135°
        assert_abs_diff_eq!(
            constraint.corrected_theta(std::f64::consts::FRAC_PI_2, 25.4),
            3.0 * std::f64::consts::FRAC_PI_4,
            epsilon = 1e-12
        );
    }

    #[test]
    fn zero_offset_equals_invariant_mass_constraint() {
        let g1 = [300.0, 1.0, 0.0];
        let g2 = [250.0, 1.5, std::f64::consts::PI];
        let v_z = [0.0];
        let vertex = VertexConstraint::new(135.0)
            .residuals(&[&g1, &g2, &v_z])
            .unwrap();
        let mass = InvariantMassConstraint::new(135.0)
            .residuals(&[&g1, &g2])
            .unwrap();
        assert_abs_diff_eq!(vertex[0], mass[0], epsilon = 1e-10);
    }

    #[test]
    fn inputs_are_not_modified() {
        let g1 = vec![300.0, 1.0, 0.0];
        let g2 = vec![250.0, 1.5, 3.0];
        let v_z = vec![3.0];
        let params = [g1.as_slice(), g2.as_slice(), v_z.as_slice()];
        let _ = VertexConstraint::new(135.0).residuals(&params).unwrap();
        assert_eq!(params.len(), 3);
        assert_eq!(g1, vec![300.0, 1.0, 0.0]);
        assert_eq!(g2, vec![250.0, 1.5, 3.0]);
    }

    #[test]
    fn malformed_participants_are_rejected() {
        let constraint = VertexConstraint::new(135.0);
        let g1 = [300.0, 1.0, 0.0];
        assert!(constraint.residuals(&[]).is_err());
        assert!(constraint.residuals(&[&[0.0]]).is_err());
        assert_eq!(
            constraint.residuals(&[&g1, &g1]).unwrap_err(),
            KinematicError::WrongParameterCount {
                expected: 1,
                actual: 3
            }
        );
    }
}
