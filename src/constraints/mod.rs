//! Residual functions of the kinematic fit
//!
//! Every constraint is a plain value holding its own configuration (masses, radius). The fitter
//! calls it repeatedly with the current iterate, so implementations must be pure functions of
//! their arguments.

mod constraint;
pub use constraint::{Constraint, ConstraintTrait};

mod energy_momentum;
pub use energy_momentum::EnergyMomentumBalance;

mod invariant_mass;
pub use invariant_mass::InvariantMassConstraint;

mod vertex;
pub use vertex::VertexConstraint;
