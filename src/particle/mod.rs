mod fit_particle;
pub use fit_particle::{FitParticle, N_PARAMS, four_momentum};

mod particle_type;
pub use particle_type::ParticleType;
