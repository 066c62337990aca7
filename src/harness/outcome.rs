use crate::error::KinematicError;
use crate::nl_fit::{FitResult, FitStatus};

use serde::{Deserialize, Serialize};

/// What happened to one tagger hit of an event
#[derive(Clone, Debug, PartialEq)]
pub enum TaggerHitOutcome {
    /// The true final state is not one proton plus the requested number of photons
    TopologyMismatch,
    /// A particle could not be turned into a 4-momentum, the hit was not fitted
    KinematicReject(KinematicError),
    FitFailed(FitStatus),
    Fitted(FitResult),
}

impl TaggerHitOutcome {
    pub fn is_fitted(&self) -> bool {
        matches!(self, Self::Fitted(_))
    }

    pub fn fit_result(&self) -> Option<&FitResult> {
        match self {
            Self::Fitted(result) => Some(result),
            _ => None,
        }
    }
}

/// Per-run bookkeeping of tagger hit outcomes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounters {
    pub events: u64,
    pub tagger_hits: u64,
    pub topology_mismatches: u64,
    pub kinematic_rejections: u64,
    pub fit_failures: u64,
    pub fitted: u64,
}

impl RunCounters {
    pub(super) fn record(&mut self, outcome: &TaggerHitOutcome) {
        self.tagger_hits += 1;
        match outcome {
            TaggerHitOutcome::TopologyMismatch => self.topology_mismatches += 1,
            TaggerHitOutcome::KinematicReject(_) => self.kinematic_rejections += 1,
            TaggerHitOutcome::FitFailed(_) => self.fit_failures += 1,
            TaggerHitOutcome::Fitted(_) => self.fitted += 1,
        }
    }
}
