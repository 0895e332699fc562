#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::dist::{Gamma, Gaussian};
use crate::priors::ComponentPrior;
use crate::suffstats::WeightedGaussianStat;

/// Variational parameters of one component's Normal-Gamma factor,
///
/// ```math
/// q(μ, τ) = N(μ | m, (βτ)⁻¹) Gamma(τ | a, b)
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct ComponentParams {
    /// Posterior mean of the level
    pub m: f64,
    /// Precision of the level, in units of the noise precision
    pub beta: f64,
    /// Noise precision shape
    pub shape: f64,
    /// Noise precision rate
    pub rate: f64,
}

impl ComponentParams {
    /// Start the variational factor at the prior.
    pub fn from_prior(prior: &ComponentPrior) -> Self {
        ComponentParams {
            m: prior.level().mu(),
            beta: prior.level().precision(),
            shape: prior.noise().shape(),
            rate: prior.noise().rate(),
        }
    }

    /// Conjugate update of `prior` given responsibility-weighted statistics.
    ///
    /// An empty component, Nₖ = 0, collapses back to the prior.
    pub fn posterior(
        prior: &ComponentPrior,
        stat: &WeightedGaussianStat,
    ) -> Self {
        let m0 = prior.level().mu();
        let beta0 = prior.level().precision();
        let nk = stat.n();
        let xbar = stat.mean();

        let beta = beta0 + nk;
        let m = beta0.mul_add(m0, nk * xbar) / beta;
        let shape = 0.5_f64.mul_add(nk, prior.noise().shape());
        let dx = xbar - m0;
        let rate = 0.5_f64.mul_add(
            stat.scatter() + beta0 * nk * dx * dx / beta,
            prior.noise().rate(),
        );

        ComponentParams {
            m,
            beta,
            shape,
            rate,
        }
    }

    /// All parameters finite and the scale parameters positive
    pub fn is_valid(&self) -> bool {
        self.m.is_finite()
            && self.beta.is_finite()
            && self.shape.is_finite()
            && self.rate.is_finite()
            && self.beta > 0.0
            && self.shape > 0.0
            && self.rate > 0.0
    }

    /// E[τ]
    #[inline]
    pub fn e_precision(&self) -> f64 {
        self.shape / self.rate
    }

    /// Belief over the noise precision, τ
    #[inline]
    pub fn noise(&self) -> Gamma {
        Gamma::new_unchecked(self.shape, self.rate)
    }

    /// Belief over the level with τ fixed at its expectation,
    /// N(m, (β E[τ])⁻¹).
    #[inline]
    pub fn level(&self) -> Gaussian {
        Gaussian::new_unchecked(
            self.m,
            (self.beta * self.e_precision()).sqrt().recip(),
        )
    }
}
