#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Responsibility-weighted Gaussian sufficient statistic.
///
/// Holds the total weight, Nₖ = Σ wₙ, the weighted mean, x̄ₖ, and the weighted
/// scatter, Sₖ = Σ wₙ(xₙ - x̄ₖ)². Updates use a weighted Welford recurrence
/// so the scatter never comes from subtracting two large sums.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct WeightedGaussianStat {
    /// Total weight
    n: f64,
    /// Weighted mean of `x`
    mean: f64,
    /// Weighted sum of squared deviations from `mean`
    sx: f64,
}

impl WeightedGaussianStat {
    #[inline]
    pub fn new() -> Self {
        WeightedGaussianStat {
            n: 0.0,
            mean: 0.0,
            sx: 0.0,
        }
    }

    /// Create a sufficient statistic from components without checking whether
    /// they are valid.
    #[inline]
    pub fn from_parts_unchecked(n: f64, mean: f64, sx: f64) -> Self {
        WeightedGaussianStat { n, mean, sx }
    }

    /// Build the statistic from paired data and weights, in order.
    pub fn from_weighted<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a f64, &'a f64)>,
    {
        let mut stat = WeightedGaussianStat::new();
        pairs.into_iter().for_each(|(x, w)| stat.observe_weighted(*x, *w));
        stat
    }

    /// Total weight, Nₖ
    #[inline]
    pub fn n(&self) -> f64 {
        self.n
    }

    /// Weighted mean, x̄ₖ. Zero when no weight has been observed.
    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Weighted scatter, Sₖ
    #[inline]
    pub fn scatter(&self) -> f64 {
        self.sx
    }

    /// Σ wₙ(xₙ - c)² for an arbitrary center `c`
    #[inline]
    pub fn scatter_about(&self, c: f64) -> f64 {
        let d = self.mean - c;
        (self.n * d).mul_add(d, self.sx)
    }

    /// Incorporate `x` with weight `w`. Zero weights are skipped.
    pub fn observe_weighted(&mut self, x: f64, w: f64) {
        if w <= 0.0 {
            return;
        }
        let n_new = self.n + w;
        let delta = x - self.mean;
        let mean_new = delta.mul_add(w / n_new, self.mean);
        self.sx = (w * delta).mul_add(x - mean_new, self.sx);
        self.mean = mean_new;
        self.n = n_new;
    }
}

impl Default for WeightedGaussianStat {
    fn default() -> Self {
        WeightedGaussianStat::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1E-12;

    #[test]
    fn from_parts_unchecked() {
        let stat = WeightedGaussianStat::from_parts_unchecked(10.0, 0.5, 1.2);
        assert_eq!(stat.n(), 10.0);
        assert_eq!(stat.mean(), 0.5);
        assert_eq!(stat.scatter(), 1.2);
    }

    #[test]
    fn unit_weights_match_unweighted_stats() {
        let xs: Vec<f64> = vec![0.0, 1.2, 2.3, 4.6];
        let ws = vec![1.0; 4];
        let stat = WeightedGaussianStat::from_weighted(xs.iter().zip(&ws));

        assert::close(stat.n(), 4.0, TOL);
        assert::close(stat.mean(), 2.025, 1e-14);
        // Σx² - n x̄² = 27.89 - 4 * 2.025²
        assert::close(stat.scatter(), 11.4875, 1e-12);
    }

    #[test]
    fn weights_scale_contribution() {
        let xs: Vec<f64> = vec![1.0, 3.0];
        let ws: Vec<f64> = vec![0.25, 0.75];
        let stat = WeightedGaussianStat::from_weighted(xs.iter().zip(&ws));

        assert::close(stat.n(), 1.0, TOL);
        assert::close(stat.mean(), 2.5, TOL);
        // 0.25 * 1.5² + 0.75 * 0.5²
        assert::close(stat.scatter(), 0.75, TOL);
    }

    #[test]
    fn zero_weight_is_empty() {
        let xs: Vec<f64> = vec![100.0, 200.0];
        let ws: Vec<f64> = vec![0.0, 0.0];
        let stat = WeightedGaussianStat::from_weighted(xs.iter().zip(&ws));

        assert_eq!(stat, WeightedGaussianStat::new());
        assert_eq!(stat.mean(), 0.0);
    }

    #[test]
    fn scatter_about_shifts_center() {
        let xs: Vec<f64> = vec![1.0, 2.0, 6.0];
        let ws: Vec<f64> = vec![1.0, 0.5, 2.0];
        let stat = WeightedGaussianStat::from_weighted(xs.iter().zip(&ws));

        let direct: f64 = xs
            .iter()
            .zip(&ws)
            .map(|(x, w)| w * (x - 1.5) * (x - 1.5))
            .sum();
        assert::close(stat.scatter_about(1.5), direct, 1E-12);
    }
}
