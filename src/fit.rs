//! Fit price levels to observations
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use tracing::debug;

use crate::posterior::Posterior;
use crate::priors::{price_range, Priors};
use crate::result::{ConfigError, Result};
use crate::vb::{Convergence, VbEngine};

/// Default iteration cap
pub const DEFAULT_MAX_ITERS: usize = 200;
/// Default relative ELBO tolerance
pub const DEFAULT_TOL: f64 = 1E-6;

/// Controls when the inference loop stops.
///
/// # Example
///
/// ```
/// use supres::fit::FitConfig;
///
/// let config = FitConfig::default().with_max_iters(50).with_tol(1E-8);
/// assert_eq!(config.max_iters(), 50);
/// assert!(config.validate().is_ok());
/// assert!(config.with_max_iters(0).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case", default))]
pub struct FitConfig {
    max_iters: usize,
    tol: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        FitConfig {
            max_iters: DEFAULT_MAX_ITERS,
            tol: DEFAULT_TOL,
        }
    }
}

impl FitConfig {
    /// Set the maximum number of iterations
    #[must_use]
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the relative ELBO tolerance
    #[must_use]
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    #[inline]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    #[inline]
    pub fn tol(&self) -> f64 {
        self.tol
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.max_iters == 0 {
            Err(ConfigError::MaxItersIsZero)
        } else if !self.tol.is_finite() || self.tol < 0.0 {
            Err(ConfigError::InvalidTolerance { tol: self.tol })
        } else {
            Ok(())
        }
    }
}

/// Outcome of a completed fit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct Fit {
    /// The posterior at termination
    pub posterior: Posterior,
    /// `false` if the iteration cap was hit first
    pub converged: bool,
    /// Number of completed iterations
    pub iterations: usize,
    /// ELBO after each iteration
    pub elbo: Vec<f64>,
}

impl Fit {
    /// Estimated price levels
    pub fn means(&self) -> &[f64] {
        self.posterior.means()
    }

    /// Expected noise variance around each level
    pub fn variances(&self) -> &[f64] {
        self.posterior.variances()
    }

    /// Posterior mean mixing weights
    pub fn mixing_weights(&self) -> &[f64] {
        self.posterior.weights()
    }
}

/// Learn `k` price levels from `xs` using priors spread over the data range.
///
/// # Example
///
/// ```
/// use supres::fit::{fit, FitConfig};
///
/// let xs = [10.1, 9.9, 10.0, 10.2, 9.8];
/// let result = fit(&xs, 1, &FitConfig::default()).unwrap();
///
/// assert!(result.converged);
/// assert_eq!(result.means().len(), 1);
/// assert_eq!(result.mixing_weights(), &[1.0]);
/// ```
pub fn fit(xs: &[f64], k: usize, config: &FitConfig) -> Result<Fit> {
    config.validate()?;
    let priors = Priors::from_data(xs, k)?;
    fit_with_priors(xs, &priors, config)
}

/// Learn price levels from `xs` starting from caller-built priors.
pub fn fit_with_priors(
    xs: &[f64],
    priors: &Priors,
    config: &FitConfig,
) -> Result<Fit> {
    config.validate()?;
    price_range(xs)?;

    debug!(
        n = xs.len(),
        k = priors.k(),
        max_iters = config.max_iters(),
        tol = config.tol(),
        "fitting price levels"
    );

    let mut engine = VbEngine::new(xs, priors);
    let decision = engine.run(config)?;

    Ok(Fit {
        posterior: engine.posterior(),
        converged: decision == Convergence::Converged,
        iterations: engine.n_iters(),
        elbo: engine.elbo_trace().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::FitError;

    #[test]
    fn default_config() {
        let config = FitConfig::default();
        assert_eq!(config.max_iters(), 200);
        assert_eq!(config.tol(), 1E-6);
    }

    #[test]
    fn invalid_tolerance() {
        let config = FitConfig::default().with_tol(f64::NAN);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTolerance { .. })
        ));
        let config = FitConfig::default().with_tol(-1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_components_is_invalid_configuration() {
        let err = fit(&[1.0, 2.0], 0, &FitConfig::default()).unwrap_err();
        assert_eq!(
            err,
            FitError::InvalidConfiguration(ConfigError::ComponentCountIsZero)
        );
    }

    #[test]
    fn empty_observations_is_invalid_configuration() {
        let err = fit(&[], 2, &FitConfig::default()).unwrap_err();
        assert_eq!(
            err,
            FitError::InvalidConfiguration(ConfigError::NoObservations)
        );
    }

    #[test]
    fn zero_iteration_cap_is_invalid_configuration() {
        let config = FitConfig::default().with_max_iters(0);
        let err = fit(&[1.0, 2.0], 1, &config).unwrap_err();
        assert_eq!(
            err,
            FitError::InvalidConfiguration(ConfigError::MaxItersIsZero)
        );
    }

    #[test]
    fn iteration_cap_is_not_an_error() {
        let xs = [1.0, 1.5, 7.0, 7.5, 12.0];
        let config = FitConfig::default().with_max_iters(1);
        let result = fit(&xs, 3, &config).unwrap();
        assert!(!result.converged);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.means().len(), 3);
    }
}
