//! Reportable posterior of a price-level fit
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::dist::{Dirichlet, Gamma, Gaussian, Mixture, MixtureError};
use crate::vb::ComponentParams;

/// Immutable snapshot of the variational posterior.
///
/// Per component `k` with factor N(μ | m, (βτ)⁻¹) Gamma(τ | a, b):
///
/// - `means[k]` is m, the estimated price level.
/// - `variances[k]` is the expected observation-noise variance,
///   E[1/τ] = b / (a - 1). When a ≤ 1 that expectation diverges and b / a,
///   the reciprocal of E[τ], is reported instead.
/// - `level_variances[k]` is the marginal variance of the level itself,
///   b / (β(a - 1)), with the same b / (βa) fallback.
/// - `weights[k]` is the posterior mean mixing weight, αₖ / Σα.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct Posterior {
    params: Vec<ComponentParams>,
    mixing: Dirichlet,
    means: Vec<f64>,
    variances: Vec<f64>,
    level_variances: Vec<f64>,
    weights: Vec<f64>,
}

/// Expected noise variance, falling back to 1/E[τ] when the shape is ≤ 1
fn noise_variance(q: &ComponentParams) -> f64 {
    q.noise().expected_recip().unwrap_or(q.rate / q.shape)
}

impl Posterior {
    pub fn new(params: Vec<ComponentParams>, mixing: Dirichlet) -> Self {
        let means = params.iter().map(|q| q.m).collect();
        let variances = params.iter().map(noise_variance).collect();
        let level_variances =
            params.iter().map(|q| noise_variance(q) / q.beta).collect();
        let sum_alpha = mixing.sum_alpha();
        let weights = mixing.alphas().iter().map(|a| a / sum_alpha).collect();

        Posterior {
            params,
            mixing,
            means,
            variances,
            level_variances,
            weights,
        }
    }

    /// Number of components
    #[inline]
    pub fn k(&self) -> usize {
        self.params.len()
    }

    /// Estimated price levels
    #[inline]
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    /// Expected noise variance around each level
    #[inline]
    pub fn variances(&self) -> &[f64] {
        &self.variances
    }

    /// Uncertainty in each level estimate
    #[inline]
    pub fn level_variances(&self) -> &[f64] {
        &self.level_variances
    }

    /// Posterior mean mixing weights
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Variational parameters of each component
    #[inline]
    pub fn params(&self) -> &[ComponentParams] {
        &self.params
    }

    /// Belief over the mixing weights
    #[inline]
    pub fn mixing(&self) -> &Dirichlet {
        &self.mixing
    }

    /// Belief over level `k`, with the marginal level variance
    pub fn level(&self, k: usize) -> Gaussian {
        Gaussian::new_unchecked(self.means[k], self.level_variances[k].sqrt())
    }

    /// Belief over the noise precision of level `k`
    pub fn noise(&self, k: usize) -> Gamma {
        self.params[k].noise()
    }

    /// Plug-in predictive density: each level with its expected noise,
    /// weighted by the expected mixing weights.
    pub fn predictive(&self) -> Result<Mixture<Gaussian>, MixtureError> {
        let components = self
            .means
            .iter()
            .zip(self.variances.iter())
            .map(|(&m, &v)| Gaussian::new_unchecked(m, v.sqrt()))
            .collect();
        Mixture::new(self.weights.clone(), components)
    }

    /// `(mean, variance, weight)` for each level in ascending order of mean.
    ///
    /// Component labels are arbitrary, so this is the form to compare fits
    /// by.
    pub fn sorted_by_mean(&self) -> Vec<(f64, f64, f64)> {
        let mut triples: Vec<(f64, f64, f64)> = self
            .means
            .iter()
            .zip(self.variances.iter())
            .zip(self.weights.iter())
            .map(|((&m, &v), &w)| (m, v, w))
            .collect();
        triples.sort_by(|a, b| a.0.total_cmp(&b.0));
        triples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{Rv, Variance};

    const TOL: f64 = 1E-12;

    fn posterior() -> Posterior {
        let params = vec![
            ComponentParams {
                m: 110.0,
                beta: 4.0,
                shape: 3.0,
                rate: 8.0,
            },
            ComponentParams {
                m: 100.0,
                beta: 2.0,
                shape: 0.5,
                rate: 1.0,
            },
        ];
        Posterior::new(params, Dirichlet::new(vec![3.0, 1.0]).unwrap())
    }

    #[test]
    fn variance_is_expected_noise_variance() {
        let post = posterior();
        // b / (a - 1) = 8 / 2
        assert::close(post.variances()[0], 4.0, TOL);
        assert::close(post.level_variances()[0], 1.0, TOL);
    }

    #[test]
    fn variance_falls_back_when_shape_at_most_one() {
        let post = posterior();
        // b / a = 1 / 0.5
        assert::close(post.variances()[1], 2.0, TOL);
        assert::close(post.level_variances()[1], 1.0, TOL);
    }

    #[test]
    fn weights_are_normalized_concentrations() {
        let post = posterior();
        assert::close(post.weights()[0], 0.75, TOL);
        assert::close(post.weights()[1], 0.25, TOL);
    }

    #[test]
    fn level_belief_uses_level_variance() {
        let post = posterior();
        let level = post.level(0);
        assert::close(level.mu(), 110.0, TOL);
        assert::close(level.variance().unwrap(), 1.0, TOL);
        assert_eq!(post.noise(1).shape(), 0.5);
    }

    #[test]
    fn sorted_by_mean_orders_levels() {
        let post = posterior();
        let sorted = post.sorted_by_mean();
        assert_eq!(sorted[0], (100.0, 2.0, 0.25));
        assert_eq!(sorted[1], (110.0, 4.0, 0.75));
    }

    #[test]
    fn predictive_is_a_density() {
        let mm = posterior().predictive().unwrap();
        assert_eq!(mm.k(), 2);
        assert!(mm.ln_f(&105.0).is_finite());
    }
}
