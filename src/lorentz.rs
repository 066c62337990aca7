use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Energy-momentum 4-vector, `z` is the beam axis
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LorentzVector {
    pub momentum: Vector3<f64>,
    pub energy: f64,
}

impl LorentzVector {
    pub fn new(px: f64, py: f64, pz: f64, energy: f64) -> Self {
        Self {
            momentum: Vector3::new(px, py, pz),
            energy,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Particle at rest
    pub fn at_rest(mass: f64) -> Self {
        Self::new(0.0, 0.0, 0.0, mass)
    }

    /// Build from momentum magnitude and direction, `theta` is measured from the `z` axis
    pub fn from_mag_theta_phi(p: f64, theta: f64, phi: f64, energy: f64) -> Self {
        let (sin_theta, cos_theta) = theta.sin_cos();
        let (sin_phi, cos_phi) = phi.sin_cos();
        Self::new(
            p * sin_theta * cos_phi,
            p * sin_theta * sin_phi,
            p * cos_theta,
            energy,
        )
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.momentum.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.momentum.y
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.momentum.z
    }

    #[inline]
    pub fn e(&self) -> f64 {
        self.energy
    }

    pub fn p(&self) -> f64 {
        self.momentum.norm()
    }

    /// Polar angle in `[0, π]`, zero for a null momentum
    pub fn theta(&self) -> f64 {
        let perp = self.momentum.x.hypot(self.momentum.y);
        if perp == 0.0 && self.momentum.z == 0.0 {
            0.0
        } else {
            perp.atan2(self.momentum.z)
        }
    }

    /// Azimuthal angle in `(-π, π]`, zero for a momentum along the beam axis
    pub fn phi(&self) -> f64 {
        if self.momentum.x == 0.0 && self.momentum.y == 0.0 {
            0.0
        } else {
            self.momentum.y.atan2(self.momentum.x)
        }
    }

    pub fn mass2(&self) -> f64 {
        self.energy * self.energy - self.momentum.norm_squared()
    }

    /// Invariant mass, negative for space-like vectors
    pub fn mass(&self) -> f64 {
        let m2 = self.mass2();
        if m2 < 0.0 { -(-m2).sqrt() } else { m2.sqrt() }
    }

    /// Components ordered as `(x, y, z, E)`
    pub fn to_array(&self) -> [f64; 4] {
        [self.x(), self.y(), self.z(), self.e()]
    }
}

impl Add for LorentzVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            momentum: self.momentum + rhs.momentum,
            energy: self.energy + rhs.energy,
        }
    }
}

impl Sub for LorentzVector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            momentum: self.momentum - rhs.momentum,
            energy: self.energy - rhs.energy,
        }
    }
}

impl AddAssign for LorentzVector {
    fn add_assign(&mut self, rhs: Self) {
        self.momentum += rhs.momentum;
        self.energy += rhs.energy;
    }
}

impl SubAssign for LorentzVector {
    fn sub_assign(&mut self, rhs: Self) {
        self.momentum -= rhs.momentum;
        self.energy -= rhs.energy;
    }
}

impl Sum for LorentzVector {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, v| acc + v)
    }
}

impl<'a> Sum<&'a LorentzVector> for LorentzVector {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Invariant mass of the summed 4-momenta
pub fn invariant_mass<'a>(vectors: impl IntoIterator<Item = &'a LorentzVector>) -> f64 {
    vectors.into_iter().sum::<LorentzVector>().mass()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn angles_of_mag_theta_phi() {
        let v = LorentzVector::from_mag_theta_phi(3.0, 1.2, -2.5, 10.0);
        assert_abs_diff_eq!(v.p(), 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v.theta(), 1.2, epsilon = 1e-12);
        assert_abs_diff_eq!(v.phi(), -2.5, epsilon = 1e-12);
    }

    #[test]
    fn beam_axis_has_zero_angles() {
        let v = LorentzVector::new(0.0, 0.0, 5.0, 5.0);
        assert_eq!(v.theta(), 0.0);
        assert_eq!(v.phi(), 0.0);
        let backward = LorentzVector::new(0.0, 0.0, -5.0, 5.0);
        assert_abs_diff_eq!(backward.theta(), PI, epsilon = 1e-15);
    }

    #[test]
    fn back_to_back_photons_mass() {
        let g1 = LorentzVector::from_mag_theta_phi(100.0, PI / 2.0, 0.0, 100.0);
        let g2 = LorentzVector::from_mag_theta_phi(100.0, PI / 2.0, PI, 100.0);
        assert_abs_diff_eq!(invariant_mass([&g1, &g2]), 200.0, epsilon = 1e-10);
        assert_abs_diff_eq!(g1.mass(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn space_like_mass_is_negative() {
        let v = LorentzVector::new(3.0, 0.0, 4.0, 0.0);
        assert_abs_diff_eq!(v.mass(), -5.0, epsilon = 1e-12);
    }

    #[test]
    fn arithmetic() {
        let a = LorentzVector::new(1.0, 2.0, 3.0, 10.0);
        let b = LorentzVector::new(0.5, -1.0, 2.0, 4.0);
        let mut c = a;
        c += b;
        c -= b;
        assert_eq!(c, a);
        assert_eq!((a + b - b).to_array(), a.to_array());
        assert_eq!([a, b].into_iter().sum::<LorentzVector>(), a + b);
    }
}
