use lazy_static::lazy_static;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Particle species known to the analysis, masses in MeV
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[non_exhaustive]
pub enum ParticleType {
    Photon,
    Proton,
    Neutron,
    PiCharged,
    ECharged,
    Pi0,
    Eta,
}

impl ParticleType {
    pub const PROTON_MASS: f64 = 938.272046;

    pub const ALL: [ParticleType; 7] = [
        Self::Photon,
        Self::Proton,
        Self::Neutron,
        Self::PiCharged,
        Self::ECharged,
        Self::Pi0,
        Self::Eta,
    ];

    pub fn mass(&self) -> f64 {
        match self {
            Self::Photon => 0.0,
            Self::Proton => Self::PROTON_MASS,
            Self::Neutron => 939.565379,
            Self::PiCharged => 139.57018,
            Self::ECharged => 0.510998928,
            Self::Pi0 => 134.9766,
            Self::Eta => 547.853,
        }
    }

    pub fn print_name(&self) -> &'static str {
        match self {
            Self::Photon => "Photon",
            Self::Proton => "Proton",
            Self::Neutron => "Neutron",
            Self::PiCharged => "PiCharged",
            Self::ECharged => "eCharged",
            Self::Pi0 => "Pi0",
            Self::Eta => "Eta",
        }
    }

    /// Species the detector can identify directly, i.e. not reconstructed from decay products
    pub fn detectable_types() -> &'static [ParticleType] {
        &DETECTABLE_TYPES
    }

    pub fn from_name(name: &str) -> Option<Self> {
        TYPES_BY_NAME.get(name).copied()
    }
}

impl fmt::Display for ParticleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.print_name())
    }
}

const DETECTABLE_TYPES: [ParticleType; 5] = [
    ParticleType::Photon,
    ParticleType::Proton,
    ParticleType::PiCharged,
    ParticleType::ECharged,
    ParticleType::Neutron,
];

lazy_static! {
    static ref TYPES_BY_NAME: BTreeMap<&'static str, ParticleType> = ParticleType::ALL
        .iter()
        .map(|t| (t.print_name(), *t))
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_lookup_round_trip() {
        for t in ParticleType::ALL {
            assert_eq!(ParticleType::from_name(t.print_name()), Some(t));
        }
        assert_eq!(ParticleType::from_name("Graviton"), None);
    }

    #[test]
    fn composite_mesons_are_not_detectable() {
        let detectable = ParticleType::detectable_types();
        assert!(!detectable.contains(&ParticleType::Pi0));
        assert!(!detectable.contains(&ParticleType::Eta));
        assert!(detectable.contains(&ParticleType::Proton));
    }
}
