//! Constrained least-squares fitting
//!
//! # Overview
//!
//! [KinematicFitter] adjusts measured variables within their uncertainties, and solves for free
//! unmeasured variables, so that a set of constraints holds exactly. Constraints are registered
//! with the names of the variables they act on, see [crate::constraints].
//!
//! # Data flow
//!
//! The fitter owns no caller data. A fit is a pure function of its inputs:
//!
//! ```text
//! FitInputs ──do_fit──→ FitResult
//!  values, sigmas        status, chi2, ndf, probability, iterations,
//!  unmeasured guesses    per-component values / sigmas before and after, pulls
//! ```
//!
//! The caller copies [FitResult::values_after] back into its own objects when the fit succeeds.
//!
//! # Degrees of freedom
//!
//! `ndf` is the total number of constraint equations minus the number of unmeasured components.
//! Fits with `ndf <= 0` report a probability of one.

mod fitter;
pub use fitter::KinematicFitter;

mod inputs;
pub use inputs::{FitInputs, Measurement};

mod result;
pub use result::{BeforeAfter, FitResult, FitStatus, FitVariable};

mod settings;
pub use settings::FitSettings;
