//! Errors raised while configuring or running a fit
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use std::fmt;

use crate::dist::{DirichletError, GammaError, GaussianError};

pub type Result<T> = std::result::Result<T, FitError>;

/// Something about the requested fit makes it impossible to start.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum ConfigError {
    /// Zero mixture components were requested
    ComponentCountIsZero,
    /// The observation set is empty
    NoObservations,
    /// An observation is infinite or NaN
    NonFiniteObservation { ix: usize, x: f64 },
    /// More than one component was requested over a zero-width price range
    DegenerateRange { min: f64, max: f64 },
    /// The price range is inverted or its width overflows
    RangeNotFinite { min: f64, max: f64 },
    /// The iteration cap is zero
    MaxItersIsZero,
    /// The tolerance is negative, infinite, or NaN
    InvalidTolerance { tol: f64 },
    /// The number of component priors differs from the mixing prior's k
    PriorCountMismatch { components: usize, mixing: usize },
    /// A level prior is invalid
    Gaussian(GaussianError),
    /// A noise prior is invalid
    Gamma(GammaError),
    /// The mixing prior is invalid
    Dirichlet(DirichletError),
}

/// The step of an iteration that produced a non-finite value
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum Stage {
    Responsibilities,
    Parameters,
    Elbo,
}

impl Stage {
    pub fn as_str(&self) -> &str {
        match self {
            Stage::Responsibilities => "responsibility update",
            Stage::Parameters => "parameter update",
            Stage::Elbo => "evidence lower bound",
        }
    }
}

/// Failure of a call to [`fit`](crate::fit::fit).
///
/// Hitting the iteration cap is not an error; see
/// [`Fit::converged`](crate::fit::Fit::converged).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum FitError {
    /// The fit never started
    InvalidConfiguration(ConfigError),
    /// NaN or infinity appeared during an iteration
    NumericInstability { iter: usize, stage: Stage },
}

impl From<ConfigError> for FitError {
    fn from(err: ConfigError) -> Self {
        FitError::InvalidConfiguration(err)
    }
}

impl From<GaussianError> for ConfigError {
    fn from(err: GaussianError) -> Self {
        ConfigError::Gaussian(err)
    }
}

impl From<GammaError> for ConfigError {
    fn from(err: GammaError) -> Self {
        ConfigError::Gamma(err)
    }
}

impl From<DirichletError> for ConfigError {
    fn from(err: DirichletError) -> Self {
        ConfigError::Dirichlet(err)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gaussian(err) => Some(err),
            Self::Gamma(err) => Some(err),
            Self::Dirichlet(err) => Some(err),
            _ => None,
        }
    }
}

impl std::error::Error for FitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidConfiguration(err) => Some(err),
            Self::NumericInstability { .. } => None,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ComponentCountIsZero => {
                write!(f, "component count must be greater than zero")
            }
            Self::NoObservations => write!(f, "no observations"),
            Self::NonFiniteObservation { ix, x } => {
                write!(f, "non-finite observation at index {ix}: {x}")
            }
            Self::DegenerateRange { min, max } => write!(
                f,
                "cannot spread components over degenerate price range \
                 [{min}, {max}]"
            ),
            Self::RangeNotFinite { min, max } => {
                write!(f, "price range [{min}, {max}] is not a finite interval")
            }
            Self::MaxItersIsZero => {
                write!(f, "max iterations must be greater than zero")
            }
            Self::InvalidTolerance { tol } => {
                write!(f, "tolerance ({tol}) must be finite and non-negative")
            }
            Self::PriorCountMismatch { components, mixing } => write!(
                f,
                "{components} component priors but mixing prior has \
                 {mixing} categories"
            ),
            Self::Gaussian(err) => write!(f, "invalid level prior: {err}"),
            Self::Gamma(err) => write!(f, "invalid noise prior: {err}"),
            Self::Dirichlet(err) => write!(f, "invalid mixing prior: {err}"),
        }
    }
}

impl fmt::Display for FitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration(err) => {
                write!(f, "invalid configuration: {err}")
            }
            Self::NumericInstability { iter, stage } => write!(
                f,
                "numeric instability in {} at iteration {iter}",
                stage.as_str()
            ),
        }
    }
}
