//! Finite mixtures of distributions
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use rand::Rng;
use std::fmt;

use crate::misc::logsumexp;
use crate::traits::{Mean, Rv};

/// A weighted sum of component distributions,
///
/// ```math
/// f(x) = Σₖ wₖ fₖ(x)
/// ```
///
/// # Example
///
/// ```
/// use supres::dist::{Gaussian, Mixture};
/// use supres::traits::Rv;
///
/// let mm = Mixture::uniform(vec![
///     Gaussian::new(100.0, 1.0).unwrap(),
///     Gaussian::new(110.0, 1.0).unwrap(),
/// ])
/// .unwrap();
///
/// // Halfway between the levels both components contribute equally
/// let g = Gaussian::new(100.0, 1.0).unwrap();
/// assert!((mm.f(&105.0) - g.f(&105.0)).abs() < 1E-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct Mixture<Fx> {
    weights: Vec<f64>,
    components: Vec<Fx>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum MixtureError {
    /// The weights vector is empty
    WeightsEmpty,
    /// A weight is negative or not finite
    WeightInvalid { ix: usize, weight: f64 },
    /// The weights do not sum to one
    WeightsDoNotSumToOne { sum: f64 },
    /// There are a different number of weights than components
    ComponentWeightLengthMismatch { n_weights: usize, n_components: usize },
}

impl<Fx> Mixture<Fx> {
    /// Create a mixture from weights and components
    pub fn new(
        weights: Vec<f64>,
        components: Vec<Fx>,
    ) -> Result<Self, MixtureError> {
        if weights.is_empty() {
            return Err(MixtureError::WeightsEmpty);
        } else if weights.len() != components.len() {
            return Err(MixtureError::ComponentWeightLengthMismatch {
                n_weights: weights.len(),
                n_components: components.len(),
            });
        }

        weights.iter().enumerate().try_for_each(|(ix, &weight)| {
            if weight < 0.0 || !weight.is_finite() {
                Err(MixtureError::WeightInvalid { ix, weight })
            } else {
                Ok(())
            }
        })?;

        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > 1E-10 {
            Err(MixtureError::WeightsDoNotSumToOne { sum })
        } else {
            Ok(Mixture {
                weights,
                components,
            })
        }
    }

    /// Create a mixture where every component has the same weight
    pub fn uniform(components: Vec<Fx>) -> Result<Self, MixtureError> {
        let k = components.len();
        Mixture::new(vec![(k as f64).recip(); k], components)
    }

    /// Number of components
    #[inline]
    pub fn k(&self) -> usize {
        self.components.len()
    }

    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[inline]
    pub fn components(&self) -> &[Fx] {
        &self.components
    }

    // Draw a component index proportional to the weights
    fn draw_index<R: Rng>(&self, rng: &mut R) -> usize {
        let u: f64 = rng.gen();
        let mut acc = 0.0;
        for (ix, w) in self.weights.iter().enumerate() {
            acc += w;
            if u < acc {
                return ix;
            }
        }
        self.weights.len() - 1
    }
}

impl<X, Fx> Rv<X> for Mixture<Fx>
where
    Fx: Rv<X>,
{
    fn ln_f(&self, x: &X) -> f64 {
        let lfs: Vec<f64> = self
            .weights
            .iter()
            .zip(self.components.iter())
            .map(|(&w, cpnt)| w.ln() + cpnt.ln_f(x))
            .collect();

        logsumexp(&lfs)
    }

    fn f(&self, x: &X) -> f64 {
        self.weights
            .iter()
            .zip(self.components.iter())
            .fold(0.0, |acc, (&w, cpnt)| w.mul_add(cpnt.f(x), acc))
    }

    fn draw<R: Rng>(&self, rng: &mut R) -> X {
        let k = self.draw_index(rng);
        self.components[k].draw(rng)
    }
}

impl<Fx> Mean<f64> for Mixture<Fx>
where
    Fx: Mean<f64>,
{
    fn mean(&self) -> Option<f64> {
        self.weights
            .iter()
            .zip(self.components.iter())
            .try_fold(0.0, |acc, (&w, cpnt)| {
                cpnt.mean().map(|m| w.mul_add(m, acc))
            })
    }
}

impl std::error::Error for MixtureError {}

impl fmt::Display for MixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WeightsEmpty => write!(f, "empty weights vector"),
            Self::WeightInvalid { ix, weight } => {
                write!(f, "invalid weight at index {}: {}", ix, weight)
            }
            Self::WeightsDoNotSumToOne { sum } => {
                write!(f, "weights sum to {} but should sum to one", sum)
            }
            Self::ComponentWeightLengthMismatch {
                n_weights,
                n_components,
            } => write!(
                f,
                "weights has {} entries, but there are {} components",
                n_weights, n_components
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::Gaussian;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    const TOL: f64 = 1E-12;

    fn levels() -> Mixture<Gaussian> {
        Mixture::new(
            vec![0.25, 0.75],
            vec![
                Gaussian::new(100.0, 1.0).unwrap(),
                Gaussian::new(110.0, 1.0).unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_bad_weights() {
        let g = || vec![Gaussian::standard(), Gaussian::standard()];
        assert_eq!(
            Mixture::new(vec![0.5, 0.6], g()),
            Err(MixtureError::WeightsDoNotSumToOne { sum: 1.1 })
        );
        assert!(matches!(
            Mixture::new(vec![1.5, -0.5], g()),
            Err(MixtureError::WeightInvalid { ix: 1, .. })
        ));
        assert!(matches!(
            Mixture::new(vec![1.0], g()),
            Err(MixtureError::ComponentWeightLengthMismatch { .. })
        ));
        assert_eq!(
            Mixture::<Gaussian>::new(vec![], vec![]),
            Err(MixtureError::WeightsEmpty)
        );
    }

    #[test]
    fn ln_f_agrees_with_f() {
        let mm = levels();
        for x in [95.0, 100.0, 104.0, 110.0, 120.0] {
            assert::close(mm.ln_f(&x), mm.f(&x).ln(), 1E-10);
        }
    }

    #[test]
    fn mean_is_weighted_component_mean() {
        assert::close(levels().mean().unwrap(), 107.5, TOL);
    }

    #[test]
    fn draws_follow_weights() {
        let mut rng = Xoshiro256Plus::seed_from_u64(0xABCD);
        let mm = levels();
        let xs: Vec<f64> = mm.sample(4_000, &mut rng);
        let frac_high =
            xs.iter().filter(|&&x| x > 105.0).count() as f64 / 4_000.0;
        assert::close(frac_high, 0.75, 0.05);
    }
}
