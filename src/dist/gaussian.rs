//! Gaussian/Normal distribution over x in (-∞, ∞)
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use rand::Rng;
use rand_distr::Normal;
use std::fmt;

use crate::consts::{HALF_LN_2PI, HALF_LN_2PI_E};
use crate::impl_display;
use crate::traits::{ContinuousDistr, Entropy, Mean, Rv, Support, Variance};

/// Gaussian / [Normal distribution](https://en.wikipedia.org/wiki/Normal_distribution),
/// N(μ, σ) over real values.
///
/// In the price-level model a `Gaussian` is the belief over where a level
/// sits, so it is usually built from a mean and a precision.
///
/// ```
/// use supres::dist::Gaussian;
///
/// let level = Gaussian::from_mean_precision(101.5, 4.0).unwrap();
/// assert_eq!(level.sigma(), 0.5);
/// assert_eq!(level.precision(), 4.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct Gaussian {
    /// Mean
    mu: f64,
    /// Standard deviation
    sigma: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum GaussianError {
    /// The mu parameter is infinite or NaN
    MuNotFinite { mu: f64 },
    /// The sigma parameter is less than or equal to zero
    SigmaTooLow { sigma: f64 },
    /// The sigma parameter is infinite or NaN
    SigmaNotFinite { sigma: f64 },
    /// The precision parameter is less than or equal to zero
    PrecisionTooLow { precision: f64 },
    /// The precision parameter is infinite or NaN
    PrecisionNotFinite { precision: f64 },
}

impl Gaussian {
    /// Create a new Gaussian distribution
    ///
    /// # Arguments
    /// - mu: mean
    /// - sigma: standard deviation
    pub fn new(mu: f64, sigma: f64) -> Result<Self, GaussianError> {
        if !mu.is_finite() {
            Err(GaussianError::MuNotFinite { mu })
        } else if sigma <= 0.0 {
            Err(GaussianError::SigmaTooLow { sigma })
        } else if !sigma.is_finite() {
            Err(GaussianError::SigmaNotFinite { sigma })
        } else {
            Ok(Gaussian { mu, sigma })
        }
    }

    /// Creates a new Gaussian without checking whether the parameters are
    /// valid.
    #[inline]
    pub fn new_unchecked(mu: f64, sigma: f64) -> Self {
        Gaussian { mu, sigma }
    }

    /// Create a Gaussian from its mean and precision, 1/σ².
    pub fn from_mean_precision(
        mu: f64,
        precision: f64,
    ) -> Result<Self, GaussianError> {
        if precision <= 0.0 {
            Err(GaussianError::PrecisionTooLow { precision })
        } else if !precision.is_finite() {
            Err(GaussianError::PrecisionNotFinite { precision })
        } else {
            Gaussian::new(mu, precision.sqrt().recip())
        }
    }

    /// Standard normal
    #[inline]
    pub fn standard() -> Self {
        Gaussian {
            mu: 0.0,
            sigma: 1.0,
        }
    }

    /// Get mu parameter
    #[inline]
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Get sigma parameter
    #[inline]
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// The precision, 1/σ²
    #[inline]
    pub fn precision(&self) -> f64 {
        (self.sigma * self.sigma).recip()
    }

    /// E[(x - μ)²] with μ distributed according to `self`.
    ///
    /// Equal to the squared distance from `x` to the mean plus the variance,
    /// so the uncertainty in μ is never dropped.
    ///
    /// ```
    /// # use supres::dist::Gaussian;
    /// let g = Gaussian::new(1.0, 2.0).unwrap();
    /// assert_eq!(g.expected_sq_dev(4.0), 9.0 + 4.0);
    /// ```
    #[inline]
    pub fn expected_sq_dev(&self, x: f64) -> f64 {
        let d = x - self.mu;
        d.mul_add(d, self.sigma * self.sigma)
    }
}

impl Default for Gaussian {
    fn default() -> Self {
        Gaussian::standard()
    }
}

impl From<&Gaussian> for String {
    fn from(gauss: &Gaussian) -> String {
        format!("N(μ: {}, σ: {})", gauss.mu, gauss.sigma)
    }
}

impl_display!(Gaussian);

impl Rv<f64> for Gaussian {
    fn ln_f(&self, x: &f64) -> f64 {
        let k = (x - self.mu) / self.sigma;
        (0.5 * k).mul_add(-k, -self.sigma.ln()) - HALF_LN_2PI
    }

    fn draw<R: Rng>(&self, rng: &mut R) -> f64 {
        let g = Normal::new(self.mu, self.sigma).unwrap();
        rng.sample(g)
    }

    fn sample<R: Rng>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        let g = Normal::new(self.mu, self.sigma).unwrap();
        (0..n).map(|_| rng.sample(g)).collect()
    }
}

impl Support<f64> for Gaussian {
    fn supports(&self, x: &f64) -> bool {
        x.is_finite()
    }
}

impl ContinuousDistr<f64> for Gaussian {}

impl Mean<f64> for Gaussian {
    fn mean(&self) -> Option<f64> {
        Some(self.mu)
    }
}

impl Variance<f64> for Gaussian {
    fn variance(&self) -> Option<f64> {
        Some(self.sigma * self.sigma)
    }
}

impl Entropy for Gaussian {
    fn entropy(&self) -> f64 {
        HALF_LN_2PI_E + self.sigma.ln()
    }
}

impl std::error::Error for GaussianError {}

impl fmt::Display for GaussianError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MuNotFinite { mu } => write!(f, "non-finite mu: {mu}"),
            Self::SigmaTooLow { sigma } => {
                write!(f, "sigma ({sigma}) must be greater than zero")
            }
            Self::SigmaNotFinite { sigma } => {
                write!(f, "non-finite sigma: {sigma}")
            }
            Self::PrecisionTooLow { precision } => {
                write!(f, "precision ({precision}) must be greater than zero")
            }
            Self::PrecisionNotFinite { precision } => {
                write!(f, "non-finite precision: {precision}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    const TOL: f64 = 1E-12;

    #[test]
    fn new() {
        let gauss = Gaussian::new(1.2, 3.0).unwrap();
        assert::close(gauss.mu, 1.2, TOL);
        assert::close(gauss.sigma, 3.0, TOL);
    }

    #[test]
    fn new_rejects_bad_params() {
        assert!(Gaussian::new(f64::NAN, 1.0).is_err());
        assert!(Gaussian::new(0.0, 0.0).is_err());
        assert!(Gaussian::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn from_mean_precision() {
        let gauss = Gaussian::from_mean_precision(3.0, 0.25).unwrap();
        assert::close(gauss.sigma(), 2.0, TOL);
        assert::close(gauss.variance().unwrap(), 4.0, TOL);
        assert::close(gauss.precision(), 0.25, TOL);
    }

    #[test]
    fn from_mean_precision_rejects_nonpositive_precision() {
        assert_eq!(
            Gaussian::from_mean_precision(0.0, 0.0),
            Err(GaussianError::PrecisionTooLow { precision: 0.0 })
        );
        assert!(Gaussian::from_mean_precision(0.0, f64::NAN).is_err());
    }

    #[test]
    fn standard_ln_pdf_at_zero() {
        let gauss = Gaussian::standard();
        assert::close(gauss.ln_pdf(&0.0), -0.918_938_533_204_672_7, TOL);
    }

    #[test]
    fn standard_ln_pdf_off_zero() {
        let gauss = Gaussian::standard();
        assert::close(gauss.ln_pdf(&2.1), -3.123_938_533_204_672_7, TOL);
    }

    #[test]
    fn nonstandard_ln_pdf_on_mean() {
        let gauss = Gaussian::new(-1.2, 0.33).unwrap();
        assert::close(gauss.ln_pdf(&-1.2), 0.189_724_091_316_938_46, TOL);
    }

    #[test]
    fn ln_pdf_outside_support_is_neg_infinity() {
        let gauss = Gaussian::standard();
        assert_eq!(gauss.ln_pdf(&f64::NAN), f64::NEG_INFINITY);
    }

    #[test]
    fn expected_sq_dev_adds_variance() {
        let gauss = Gaussian::new(100.0, 0.5).unwrap();
        assert::close(gauss.expected_sq_dev(100.0), 0.25, TOL);
        assert::close(gauss.expected_sq_dev(102.0), 4.25, TOL);
    }

    #[test]
    fn entropy() {
        let gauss = Gaussian::new(3.0, 12.3).unwrap();
        assert::close(gauss.entropy(), 3.928_537_795_583_044_7, TOL);
    }

    #[test]
    fn sample_moments() {
        let mut rng = Xoshiro256Plus::seed_from_u64(1337);
        let gauss = Gaussian::new(110.0, 1.0).unwrap();
        let xs = gauss.sample(10_000, &mut rng);
        let mean = xs.iter().sum::<f64>() / xs.len() as f64;
        assert::close(mean, 110.0, 0.05);
    }
}
