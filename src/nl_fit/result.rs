use crate::error::KinematicError;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum FitStatus {
    Success,
    /// Maximum number of iterations reached before the convergence criteria were met
    NoConvergence,
    /// A constraint was evaluated at an unphysical iterate
    DomainError(KinematicError),
    NonFinite,
    SingularMatrix,
}

impl FitStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for FitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("Success"),
            Self::NoConvergence => f.write_str("NoConvergence"),
            Self::DomainError(e) => write!(f, "DomainError({e})"),
            Self::NonFinite => f.write_str("NonFinite"),
            Self::SingularMatrix => f.write_str("SingularMatrix"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BeforeAfter {
    pub before: f64,
    pub after: f64,
}

/// Fit outcome of a single scalar component
#[derive(Clone, Debug, PartialEq)]
pub struct FitVariable {
    /// Component name, `Name[i]` for vector variables and `Name` for scalars
    pub name: String,
    /// Name of the registered variable the component belongs to
    pub variable: String,
    pub component: usize,
    pub measured: bool,
    pub value: BeforeAfter,
    pub sigma: BeforeAfter,
    /// `None` for unmeasured components and for measured ones the fit could not move
    pub pull: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FitResult {
    pub status: FitStatus,
    pub chi_square: f64,
    /// Number of constraint equations minus number of unmeasured components
    pub ndf: i64,
    pub probability: f64,
    pub n_iterations: u32,
    pub variables: Vec<FitVariable>,
}

impl FitResult {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn variable(&self, name: &str) -> Option<&FitVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Fitted values of every component of `variable`, in component order
    pub fn values_after(&self, variable: &str) -> Vec<f64> {
        self.variables
            .iter()
            .filter(|v| v.variable == variable)
            .sorted_by_key(|v| v.component)
            .map(|v| v.value.after)
            .collect()
    }
}

impl fmt::Display for FitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: chi2 = {:.3}, ndf = {}, probability = {:.3}, iterations = {}",
            self.status, self.chi_square, self.ndf, self.probability, self.n_iterations
        )?;
        for v in &self.variables {
            let pull = v
                .pull
                .map_or_else(|| "-".to_owned(), |pull| format!("{pull:.3}"));
            writeln!(
                f,
                "  {:<12} {:>11.4} -> {:>11.4}  sigma {:>9.4} -> {:>9.4}  pull {}",
                v.name, v.value.before, v.value.after, v.sigma.before, v.sigma.after, pull
            )?;
        }
        Ok(())
    }
}
