/// Error returned when a set of kinematic parameters has no physical 4-momentum
#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum KinematicError {
    #[error("kinetic energy {ek} is below the rest-mass threshold of mass {mass}")]
    BelowMassThreshold { ek: f64, mass: f64 },

    #[error("expected {expected} kinematic parameters, got {actual}")]
    WrongParameterCount { expected: usize, actual: usize },

    #[error("at least {minimum} particles are required, got {actual}")]
    TooFewParticles { minimum: usize, actual: usize },

    #[error("non-finite kinematic parameter: {0}")]
    NonFinite(&'static str),

    #[error("constraint {constraint} returned {actual} residuals instead of {expected}")]
    WrongResidualCount {
        constraint: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Error returned from [crate::HarnessConfig::validate]
#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("invariant-mass and vertex constraints cannot be enabled at the same time")]
    ExclusiveMassConstraints,

    #[error("at least one final-state photon is required")]
    NoPhotons,

    #[error("target mass must be a positive finite number, got {0}")]
    InvalidTargetMass(f64),

    #[error("energy scale must be a positive finite number, got {0}")]
    InvalidEnergyScale(f64),

    #[error("maximum number of fit iterations must be positive")]
    ZeroIterations,
}

/// Error returned from the [crate::KinematicFitter] setup and input API
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum FitSetupError {
    #[error("variable {0:?} is already registered")]
    DuplicateVariable(String),

    #[error("variable {0:?} is not registered")]
    UnknownVariable(String),

    #[error("variable {0:?} must have at least one component")]
    EmptyVariable(String),

    #[error("constraint {0:?} must depend on at least one variable")]
    EmptyConstraint(String),

    #[error("fitter has no constraints")]
    NoConstraints,

    #[error("no values supplied for measured variable {0:?}")]
    MissingValues(String),

    #[error("variable {name:?} has {expected} components, got {actual} values and {sigmas} sigmas")]
    WrongDimension {
        name: String,
        expected: usize,
        actual: usize,
        sigmas: usize,
    },

    #[error("sigma of variable {0:?} must be finite and non-negative")]
    InvalidSigma(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum HistogramError {
    #[error("histogram needs a positive number of bins")]
    ZeroBins,

    #[error("histogram range [{min}, {max}) is empty or not finite")]
    InvalidRange { min: f64, max: f64 },

    #[error("histogram {0:?} is already registered")]
    Duplicate(String),
}

/// Setup-time error of [crate::FitHarness]
///
/// Per-event anomalies never surface here, they only change which diagnostics get filled
#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum HarnessError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    FitSetup(#[from] FitSetupError),

    #[error(transparent)]
    Histogram(#[from] HistogramError),
}
