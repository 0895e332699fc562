//! Prior specification for the price-level mixture
//!
//! Every component gets a Gaussian belief over its level and a Gamma belief
//! over its noise precision. The mixing weights get a Dirichlet.
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::dist::{Dirichlet, Gamma, Gaussian};
use crate::result::ConfigError;

/// Precision of each level prior produced by [`Priors::from_range`]
pub const LEVEL_PRECISION: f64 = 1.0;
/// Shape of each noise prior produced by [`Priors::from_range`]
pub const NOISE_SHAPE: f64 = 2.0;
/// Rate of each noise prior produced by [`Priors::from_range`]
pub const NOISE_RATE: f64 = 2.0;

/// Prior beliefs for a single mixture component.
///
/// The level precision scales with the noise precision in the variational
/// posterior, μ | τ ~ N(m₀, (β₀τ)⁻¹), where β₀ is `level.precision()`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct ComponentPrior {
    level: Gaussian,
    noise: Gamma,
}

impl ComponentPrior {
    pub fn new(level: Gaussian, noise: Gamma) -> Self {
        ComponentPrior { level, noise }
    }

    /// Belief over the price level
    #[inline]
    pub fn level(&self) -> &Gaussian {
        &self.level
    }

    /// Belief over the noise precision around the level
    #[inline]
    pub fn noise(&self) -> &Gamma {
        &self.noise
    }
}

/// Priors for every component plus the mixing weights.
///
/// # Example
///
/// ```
/// use supres::priors::Priors;
///
/// let priors = Priors::from_range(4, 100.0, 120.0).unwrap();
/// let levels: Vec<f64> = priors
///     .components()
///     .iter()
///     .map(|cpnt| cpnt.level().mu())
///     .collect();
///
/// assert_eq!(levels, vec![100.0, 105.0, 110.0, 115.0]);
/// assert_eq!(priors.mixing().sum_alpha(), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct Priors {
    components: Vec<ComponentPrior>,
    mixing: Dirichlet,
}

impl Priors {
    /// Assemble priors from explicit parts.
    pub fn new(
        components: Vec<ComponentPrior>,
        mixing: Dirichlet,
    ) -> Result<Self, ConfigError> {
        if components.is_empty() {
            Err(ConfigError::ComponentCountIsZero)
        } else if components.len() != mixing.k() {
            Err(ConfigError::PriorCountMismatch {
                components: components.len(),
                mixing: mixing.k(),
            })
        } else {
            Ok(Priors { components, mixing })
        }
    }

    /// Spread `k` components evenly across the observed price range.
    ///
    /// Component `i` is centered at `min + i * (max - min) / k` with unit
    /// precision and a Gamma(2, 2) noise prior. The mixing prior is a
    /// symmetric Dirichlet with concentration 1/k whose last entry absorbs
    /// rounding so the concentrations sum to exactly one.
    ///
    /// A single component is allowed over a zero-width range; more than one
    /// would stack every prior on the same level.
    pub fn from_range(
        k: usize,
        min: f64,
        max: f64,
    ) -> Result<Self, ConfigError> {
        if k == 0 {
            return Err(ConfigError::ComponentCountIsZero);
        }

        let width = max - min;
        if !width.is_finite() || width < 0.0 {
            return Err(ConfigError::RangeNotFinite { min, max });
        } else if width == 0.0 && k > 1 {
            return Err(ConfigError::DegenerateRange { min, max });
        }

        let step = width / k as f64;
        let components = (0..k)
            .map(|ix| {
                let level = Gaussian::from_mean_precision(
                    (ix as f64).mul_add(step, min),
                    LEVEL_PRECISION,
                )?;
                let noise = Gamma::new(NOISE_SHAPE, NOISE_RATE)?;
                Ok(ComponentPrior::new(level, noise))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let mut alphas = vec![(k as f64).recip(); k];
        let head: f64 = alphas[..k - 1].iter().sum();
        alphas[k - 1] = 1.0 - head;
        let mixing = Dirichlet::new(alphas)?;

        Priors::new(components, mixing)
    }

    /// Validate `xs` and build [`Priors::from_range`] over its extent.
    pub fn from_data(xs: &[f64], k: usize) -> Result<Self, ConfigError> {
        let (min, max) = price_range(xs)?;
        Priors::from_range(k, min, max)
    }

    /// The number of components
    #[inline]
    pub fn k(&self) -> usize {
        self.components.len()
    }

    #[inline]
    pub fn components(&self) -> &[ComponentPrior] {
        &self.components
    }

    #[inline]
    pub fn mixing(&self) -> &Dirichlet {
        &self.mixing
    }
}

/// Minimum and maximum of a non-empty set of finite observations.
pub fn price_range(xs: &[f64]) -> Result<(f64, f64), ConfigError> {
    if xs.is_empty() {
        return Err(ConfigError::NoObservations);
    }

    xs.iter().enumerate().try_fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(min, max), (ix, &x)| {
            if x.is_finite() {
                Ok((min.min(x), max.max(x)))
            } else {
                Err(ConfigError::NonFiniteObservation { ix, x })
            }
        },
    )
}
