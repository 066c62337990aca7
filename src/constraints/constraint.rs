pub(super) use crate::error::KinematicError;
pub(super) use crate::lorentz::LorentzVector;
pub(super) use crate::particle::four_momentum;

use enum_dispatch::enum_dispatch;
pub(super) use macro_const::macro_const;
pub(super) use schemars::JsonSchema;
pub(super) use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Residual function of a kinematic fit
///
/// `params` holds the current fit iterate of every participating variable, in the order the
/// constraint was registered with, each as its own parameter list. The residual vanishes when
/// the constraint is satisfied.
#[enum_dispatch]
pub trait ConstraintTrait: Clone + Debug {
    /// Name used to register the constraint with the fitter
    fn name(&self) -> &'static str;

    /// Number of residual components
    fn size(&self) -> usize;

    fn residuals(&self, params: &[&[f64]]) -> Result<Vec<f64>, KinematicError>;
}

/// All constraints are available as variants of this enum
#[enum_dispatch(ConstraintTrait)]
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[non_exhaustive]
pub enum Constraint {
    EnergyMomentumBalance(super::energy_momentum::EnergyMomentumBalance),
    InvariantMass(super::invariant_mass::InvariantMassConstraint),
    Vertex(super::vertex::VertexConstraint),
}

/// Sum of the 4-momenta of particles sharing the same rest mass
pub(super) fn sum_four_momenta(
    params: &[&[f64]],
    mass: f64,
) -> Result<LorentzVector, KinematicError> {
    params.iter().map(|p| four_momentum(p, mass)).sum()
}
