//! Event loop of the photoproduction fit

mod config;
pub use config::{ConstraintMode, HarnessConfig};

mod fit_harness;
pub use fit_harness::FitHarness;

mod outcome;
pub use outcome::{RunCounters, TaggerHitOutcome};
