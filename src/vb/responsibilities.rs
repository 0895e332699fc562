use crate::consts::HALF_LN_2PI;
use crate::dist::{Dirichlet, Gaussian};
use crate::misc::logsumexp;
use crate::suffstats::WeightedGaussianStat;

use super::ComponentParams;

/// N×K matrix of assignment probabilities, stored row-major.
///
/// Row `n` is the categorical factor q(zₙ); every row sums to one.
#[derive(Debug, Clone, PartialEq)]
pub struct Responsibilities {
    k: usize,
    data: Vec<f64>,
}

// Per-component terms of ln ρₙₖ that do not depend on xₙ
struct Term {
    offset: f64,
    e_precision: f64,
    level: Gaussian,
}

impl Responsibilities {
    /// Compute every row from the current variational factors:
    ///
    /// ```math
    /// ln ρₙₖ = E[ln πₖ] + ½E[ln τₖ] - ½ln(2π) - ½E[τₖ]E[(xₙ - μₖ)²]
    /// ```
    ///
    /// followed by a log-sum-exp normalization of each row. Returns `None`
    /// if any row cannot be normalized.
    pub fn compute(
        xs: &[f64],
        params: &[ComponentParams],
        mixing: &Dirichlet,
    ) -> Option<Self> {
        let k = params.len();
        let terms: Vec<Term> = params
            .iter()
            .zip(mixing.expected_ln_weights())
            .map(|(q, e_ln_pi)| Term {
                offset: 0.5_f64.mul_add(q.noise().expected_ln(), e_ln_pi)
                    - HALF_LN_2PI,
                e_precision: q.e_precision(),
                level: q.level(),
            })
            .collect();

        let mut data = Vec::with_capacity(xs.len() * k);
        let mut ln_rho = vec![0.0; k];
        for &x in xs {
            ln_rho.iter_mut().zip(terms.iter()).for_each(|(ln_r, term)| {
                *ln_r = (-0.5 * term.e_precision)
                    .mul_add(term.level.expected_sq_dev(x), term.offset);
            });

            let z = logsumexp(&ln_rho);
            if !z.is_finite() {
                return None;
            }
            data.extend(ln_rho.iter().map(|ln_r| (ln_r - z).exp()));
        }

        if data.iter().all(|r| r.is_finite()) {
            Some(Responsibilities { k, data })
        } else {
            None
        }
    }

    /// Number of observations
    #[inline]
    pub fn n(&self) -> usize {
        self.data.len() / self.k
    }

    /// Number of components
    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    /// The responsibilities of every component for observation `ix`
    #[inline]
    pub fn row(&self, ix: usize) -> &[f64] {
        &self.data[ix * self.k..(ix + 1) * self.k]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.k)
    }

    /// The responsibilities of component `k` for every observation
    pub fn column(&self, k: usize) -> impl Iterator<Item = &f64> + '_ {
        self.data.iter().skip(k).step_by(self.k)
    }

    /// Weighted statistics for each component, accumulated in observation
    /// order.
    pub fn stats(&self, xs: &[f64]) -> Vec<WeightedGaussianStat> {
        (0..self.k)
            .map(|k| {
                let ws = self.column(k);
                WeightedGaussianStat::from_weighted(xs.iter().zip(ws))
            })
            .collect()
    }

    /// Entropy of q(Z), -Σ rₙₖ ln rₙₖ
    pub fn entropy(&self) -> f64 {
        -self
            .data
            .iter()
            .filter(|&&r| r > 0.0)
            .map(|r| r * r.ln())
            .sum::<f64>()
    }
}
