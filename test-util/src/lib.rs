pub use final_state::{
    FourVector, PI0_MASS, PROTON_MASS, TrueFinalState, balance_beam, closure_two_photon_event,
    fan_of_photons, invariant_mass, photon,
};
pub use generator::{PI0_EVENTS, pi0_photoproduction};

mod final_state;
mod generator;
