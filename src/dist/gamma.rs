//! Gamma distribution over x in (0, ∞)
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::impl_display;
use crate::traits::{ContinuousDistr, Entropy, Mean, Rv, Support, Variance};
use rand::Rng;
use special::Gamma as _;
use std::fmt;

/// [Gamma distribution](https://en.wikipedia.org/wiki/Gamma_distribution) G(α, β)
/// over x in (0, ∞).
///
/// **NOTE**: The gamma distribution is parameterized in terms of shape, α, and
/// rate, β.
///
/// ```math
///             β^α
/// f(x|α, β) = ----  x^(α-1) e^(-βx)
///             Γ(α)
/// ```
///
/// Used here as the belief over a component's noise precision.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct Gamma {
    shape: f64,
    rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum GammaError {
    /// Shape parameter is less than or equal to zero
    ShapeTooLow { shape: f64 },
    /// Shape parameter is infinite or NaN
    ShapeNotFinite { shape: f64 },
    /// Rate parameter is less than or equal to zero
    RateTooLow { rate: f64 },
    /// Rate parameter is infinite or NaN
    RateNotFinite { rate: f64 },
}

impl Gamma {
    /// Create a new `Gamma` distribution with shape (α) and rate (β).
    pub fn new(shape: f64, rate: f64) -> Result<Self, GammaError> {
        if shape <= 0.0 {
            Err(GammaError::ShapeTooLow { shape })
        } else if rate <= 0.0 {
            Err(GammaError::RateTooLow { rate })
        } else if !shape.is_finite() {
            Err(GammaError::ShapeNotFinite { shape })
        } else if !rate.is_finite() {
            Err(GammaError::RateNotFinite { rate })
        } else {
            Ok(Gamma::new_unchecked(shape, rate))
        }
    }

    /// Creates a new Gamma without checking whether the parameters are valid.
    #[inline]
    pub fn new_unchecked(shape: f64, rate: f64) -> Self {
        Gamma { shape, rate }
    }

    /// Get the shape parameter
    ///
    /// # Example
    ///
    /// ```rust
    /// # use supres::dist::Gamma;
    /// let gam = Gamma::new(2.0, 1.0).unwrap();
    /// assert_eq!(gam.shape(), 2.0);
    /// ```
    #[inline]
    pub fn shape(&self) -> f64 {
        self.shape
    }

    /// Get the rate parameter
    ///
    /// # Example
    ///
    /// ```rust
    /// # use supres::dist::Gamma;
    /// let gam = Gamma::new(2.0, 1.0).unwrap();
    /// assert_eq!(gam.rate(), 1.0);
    /// ```
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// E[ln x] = ψ(α) - ln(β)
    ///
    /// # Example
    ///
    /// ```rust
    /// # use supres::dist::Gamma;
    /// // ψ(1) is minus the Euler-Mascheroni constant
    /// let gam = Gamma::new(1.0, 1.0).unwrap();
    /// assert!((gam.expected_ln() + 0.577_215_664_901_532_9).abs() < 1E-10);
    /// ```
    #[inline]
    pub fn expected_ln(&self) -> f64 {
        self.shape.digamma() - self.rate.ln()
    }

    /// E[1/x], the expected reciprocal. Only finite when α > 1.
    #[inline]
    pub fn expected_recip(&self) -> Option<f64> {
        if self.shape > 1.0 {
            Some(self.rate / (self.shape - 1.0))
        } else {
            None
        }
    }
}

impl Default for Gamma {
    fn default() -> Self {
        Gamma::new_unchecked(1.0, 1.0)
    }
}

impl From<&Gamma> for String {
    fn from(gam: &Gamma) -> String {
        format!("G(α: {}, β: {})", gam.shape, gam.rate)
    }
}

impl_display!(Gamma);

impl Rv<f64> for Gamma {
    fn ln_f(&self, x: &f64) -> f64 {
        self.shape.mul_add(self.rate.ln(), -self.shape.ln_gamma().0)
            + (self.shape - 1.0).mul_add(x.ln(), -(self.rate * x))
    }

    fn draw<R: Rng>(&self, rng: &mut R) -> f64 {
        let g = rand_distr::Gamma::new(self.shape, 1.0 / self.rate).unwrap();
        rng.sample(g)
    }

    fn sample<R: Rng>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        let g = rand_distr::Gamma::new(self.shape, 1.0 / self.rate).unwrap();
        (0..n).map(|_| rng.sample(g)).collect()
    }
}

impl Support<f64> for Gamma {
    fn supports(&self, x: &f64) -> bool {
        x.is_finite() && *x > 0.0
    }
}

impl ContinuousDistr<f64> for Gamma {}

impl Mean<f64> for Gamma {
    fn mean(&self) -> Option<f64> {
        Some(self.shape / self.rate)
    }
}

impl Variance<f64> for Gamma {
    fn variance(&self) -> Option<f64> {
        Some(self.shape / (self.rate * self.rate))
    }
}

impl Entropy for Gamma {
    fn entropy(&self) -> f64 {
        self.shape - self.rate.ln()
            + (1.0 - self.shape)
                .mul_add(self.shape.digamma(), self.shape.ln_gamma().0)
    }
}

impl std::error::Error for GammaError {}

impl fmt::Display for GammaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeTooLow { shape } => {
                write!(f, "shape ({}) must be greater than zero", shape)
            }
            Self::ShapeNotFinite { shape } => {
                write!(f, "non-finite shape: {}", shape)
            }
            Self::RateTooLow { rate } => {
                write!(f, "rate ({}) must be greater than zero", rate)
            }
            Self::RateNotFinite { rate } => {
                write!(f, "non-finite rate: {}", rate)
            }
        }
    }
}
