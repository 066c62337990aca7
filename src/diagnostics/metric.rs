//! Histogram names used by the fit harness

use crate::particle::ParticleType;

pub const CHI_SQUARE: &str = "chisquare";
pub const PROBABILITY: &str = "probability";
pub const ITERATIONS: &str = "iterations";
pub const IM_TRUE: &str = "im_true";
pub const IM_SMEARED: &str = "im_smeared";
pub const IM_FIT: &str = "im_fit";
pub const VERTEX_Z_BEFORE: &str = "vertex_z_before";
pub const VERTEX_Z_AFTER: &str = "vertex_z_after";

pub const PID_BANANAS: &str = "PID Bananas";
pub const IDENTIFIED_PARTICLES: &str = "Identified particles";
pub const TAGGER_HITS: &str = "Tagger Hits";
pub const CB_ENERGY_SUM: &str = "CB Energy Sum";
pub const TAGGER_SPECTRUM: &str = "Tagger Spectrum";

/// Pull histogram of one fit component, e.g. `pull_Photon1[0]`
pub fn pull(component: &str) -> String {
    format!("pull_{component}")
}

/// Per-event multiplicity histogram of one particle type
pub fn number_of(particle_type: ParticleType) -> String {
    format!("Number of {particle_type}")
}
