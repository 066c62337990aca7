use crate::lorentz::LorentzVector;
use crate::particle::ParticleType;

use serde::{Deserialize, Serialize};

/// Calorimeter cluster with its veto (charged-particle) signal, energies in MeV
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub cluster_energy: f64,
    pub veto_energy: f64,
    pub theta: f64,
    pub phi: f64,
    pub time: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub particle_type: ParticleType,
    pub p4: LorentzVector,
}

impl Particle {
    pub fn new(particle_type: ParticleType, p4: LorentzVector) -> Self {
        Self { particle_type, p4 }
    }
}

/// Hit of the photon tagger, one candidate beam photon
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TaggerHit {
    pub channel: u32,
    pub photon_energy: f64,
    pub time: f64,
}

impl TaggerHit {
    /// Beam photon 4-momentum, the beam runs along `+z`
    pub fn photon_beam(&self) -> LorentzVector {
        LorentzVector::new(0.0, 0.0, self.photon_energy, self.photon_energy)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub cb_energy_sum: f64,
}

/// One recorded (or simulated) event
///
/// `particles` holds the reconstructed identified particles, `mc_true` the generated final
/// state. Both keep the order in which the particles were produced.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub tracks: Vec<Track>,
    pub particles: Vec<Particle>,
    pub mc_true: Vec<Particle>,
    pub tagger_hits: Vec<TaggerHit>,
    pub trigger: Trigger,
}

impl Event {
    pub fn particles_of_type(
        &self,
        particle_type: ParticleType,
    ) -> impl Iterator<Item = &Particle> {
        self.particles
            .iter()
            .filter(move |p| p.particle_type == particle_type)
    }

    pub fn true_particles_of_type(
        &self,
        particle_type: ParticleType,
    ) -> impl Iterator<Item = &Particle> {
        self.mc_true
            .iter()
            .filter(move |p| p.particle_type == particle_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beam_photon_along_z() {
        let hit = TaggerHit {
            channel: 12,
            photon_energy: 850.0,
            time: 3.0,
        };
        let beam = hit.photon_beam();
        assert_eq!(beam.z(), 850.0);
        assert_eq!(beam.e(), 850.0);
        assert_eq!(beam.mass2(), 0.0);
    }

    #[test]
    fn filter_by_type_keeps_order() {
        let event = Event {
            mc_true: vec![
                Particle::new(ParticleType::Photon, LorentzVector::new(0.0, 0.0, 1.0, 1.0)),
                Particle::new(
                    ParticleType::Proton,
                    LorentzVector::at_rest(ParticleType::PROTON_MASS),
                ),
                Particle::new(ParticleType::Photon, LorentzVector::new(0.0, 0.0, 2.0, 2.0)),
            ],
            ..Default::default()
        };
        let energies: Vec<_> = event
            .true_particles_of_type(ParticleType::Photon)
            .map(|p| p.p4.e())
            .collect();
        assert_eq!(energies, [1.0, 2.0]);
        assert_eq!(event.particles_of_type(ParticleType::Photon).count(), 0);
    }
}
