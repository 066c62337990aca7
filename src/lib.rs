#![doc = include_str!("../README.md")]


pub mod constraints;
pub use constraints::{
    Constraint, ConstraintTrait, EnergyMomentumBalance, InvariantMassConstraint, VertexConstraint,
};

mod data;
pub use data::{Event, Particle, TaggerHit, Track, Trigger};

pub mod diagnostics;
pub use diagnostics::{BinSettings, Diagnostics};

mod error;
pub use error::{ConfigError, FitSetupError, HarnessError, HistogramError, KinematicError};

mod harness;
pub use harness::{ConstraintMode, FitHarness, HarnessConfig, RunCounters, TaggerHitOutcome};

mod lorentz;
pub use lorentz::{LorentzVector, invariant_mass};

mod nl_fit;
pub use nl_fit::{
    BeforeAfter, FitInputs, FitResult, FitSettings, FitStatus, FitVariable, KinematicFitter,
    Measurement,
};

mod particle;
pub use particle::{FitParticle, N_PARAMS, ParticleType, four_momentum};

mod smearing;
pub use smearing::{ExactMeasurement, GaussianSmearing, ResolutionOnly, SmearingModel};

pub use nalgebra;
pub use ndarray;
