//! Dirichlet distribution over simplexes
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::impl_display;
use crate::misc::vec_to_string;
use crate::traits::{ContinuousDistr, Entropy, Mean, Rv, Support};
use rand::Rng;
use rand_distr::Gamma as RGamma;
use special::Gamma as _;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum DirichletError {
    /// k parameter is zero
    KIsZero,
    /// alpha vector is empty
    AlphasEmpty,
    /// alphas parameter has one or more entries less than or equal to zero
    AlphaTooLow { ix: usize, alpha: f64 },
    /// alphas parameter has one or infinite or NaN entries
    AlphaNotFinite { ix: usize, alpha: f64 },
}

/// [Dirichlet distribution](https://en.wikipedia.org/wiki/Dirichlet_distribution)
/// over points on the k-simplex.
///
/// The belief over the mixing weights of the price levels.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct Dirichlet {
    /// A `Vec` of real numbers in (0, ∞)
    alphas: Vec<f64>,
}

impl Dirichlet {
    /// Creates a `Dirichlet` with a given `alphas` vector
    pub fn new(alphas: Vec<f64>) -> Result<Self, DirichletError> {
        if alphas.is_empty() {
            return Err(DirichletError::AlphasEmpty);
        }

        alphas.iter().enumerate().try_for_each(|(ix, &alpha)| {
            if alpha <= 0.0 {
                Err(DirichletError::AlphaTooLow { ix, alpha })
            } else if !alpha.is_finite() {
                Err(DirichletError::AlphaNotFinite { ix, alpha })
            } else {
                Ok(())
            }
        })?;

        Ok(Dirichlet { alphas })
    }

    /// Creates a new Dirichlet without checking whether the parameters are
    /// valid.
    pub fn new_unchecked(alphas: Vec<f64>) -> Self {
        Dirichlet { alphas }
    }

    /// Creates a `Dirichlet` where all alphas are identical.
    ///
    /// # Examples
    ///
    /// ```
    /// # use supres::dist::Dirichlet;
    /// let dir = Dirichlet::symmetric(1.0, 4).unwrap();
    /// assert_eq!(*dir.alphas(), vec![1.0, 1.0, 1.0, 1.0]);
    /// ```
    pub fn symmetric(alpha: f64, k: usize) -> Result<Self, DirichletError> {
        if k == 0 {
            Err(DirichletError::KIsZero)
        } else if alpha <= 0.0 {
            Err(DirichletError::AlphaTooLow { ix: 0, alpha })
        } else if !alpha.is_finite() {
            Err(DirichletError::AlphaNotFinite { ix: 0, alpha })
        } else {
            Ok(Dirichlet {
                alphas: vec![alpha; k],
            })
        }
    }

    /// The length of `alphas` / the number of categories
    pub fn k(&self) -> usize {
        self.alphas.len()
    }

    /// Get a reference to the weights vector, `alphas`
    pub fn alphas(&self) -> &Vec<f64> {
        &self.alphas
    }

    /// Sum of the concentration parameters
    #[inline]
    pub fn sum_alpha(&self) -> f64 {
        self.alphas.iter().sum()
    }

    /// E[ln πₖ] = ψ(αₖ) - ψ(Σα) for every category
    ///
    /// ```
    /// # use supres::dist::Dirichlet;
    /// let dir = Dirichlet::symmetric(1.0, 2).unwrap();
    /// let ln_w = dir.expected_ln_weights();
    /// assert!((ln_w[0] + 1.0).abs() < 1E-10);
    /// ```
    pub fn expected_ln_weights(&self) -> Vec<f64> {
        let digamma_sum = self.sum_alpha().digamma();
        self.alphas
            .iter()
            .map(|alpha| alpha.digamma() - digamma_sum)
            .collect()
    }

    /// Log normalizing constant, ln Γ(Σα) - Σ ln Γ(αₖ)
    pub fn ln_norm(&self) -> f64 {
        let sum_ln_gamma: f64 =
            self.alphas.iter().map(|alpha| alpha.ln_gamma().0).sum();
        self.sum_alpha().ln_gamma().0 - sum_ln_gamma
    }
}

impl From<&Dirichlet> for String {
    fn from(dir: &Dirichlet) -> String {
        format!("Dir(α: {})", vec_to_string(&dir.alphas, 5))
    }
}

impl_display!(Dirichlet);

impl Rv<Vec<f64>> for Dirichlet {
    fn draw<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        let xs: Vec<f64> = self
            .alphas
            .iter()
            .map(|&alpha| rng.sample(RGamma::new(alpha, 1.0).unwrap()))
            .collect();
        let z: f64 = xs.iter().sum();
        xs.iter().map(|x| x / z).collect()
    }

    fn ln_f(&self, x: &Vec<f64>) -> f64 {
        let term = x
            .iter()
            .zip(self.alphas.iter())
            .fold(0.0, |acc, (&xi, &alpha)| (alpha - 1.0).mul_add(xi.ln(), acc));

        term + self.ln_norm()
    }
}

impl Support<Vec<f64>> for Dirichlet {
    fn supports(&self, x: &Vec<f64>) -> bool {
        if x.len() != self.alphas.len() {
            false
        } else {
            let sum: f64 = x.iter().sum();
            x.iter().all(|&xi| xi > 0.0) && (1.0 - sum).abs() < 1E-12
        }
    }
}

impl ContinuousDistr<Vec<f64>> for Dirichlet {}

impl Mean<Vec<f64>> for Dirichlet {
    fn mean(&self) -> Option<Vec<f64>> {
        let z = self.sum_alpha();
        Some(self.alphas.iter().map(|alpha| alpha / z).collect())
    }
}

impl Entropy for Dirichlet {
    fn entropy(&self) -> f64 {
        let sum_alpha = self.sum_alpha();
        let kf = self.k() as f64;
        let term = self
            .alphas
            .iter()
            .fold(0.0, |acc, &alpha| (alpha - 1.0).mul_add(alpha.digamma(), acc));
        (sum_alpha - kf).mul_add(sum_alpha.digamma(), -self.ln_norm()) - term
    }
}

impl std::error::Error for DirichletError {}

impl fmt::Display for DirichletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KIsZero => write!(f, "k must be greater than zero"),
            Self::AlphasEmpty => write!(f, "alphas vector was empty"),
            Self::AlphaTooLow { ix, alpha } => {
                write!(f, "Invalid alpha at index {}: {} <= 0.0", ix, alpha)
            }
            Self::AlphaNotFinite { ix, alpha } => {
                write!(f, "Non-finite alpha at index {}: {}", ix, alpha)
            }
        }
    }
}
