use itertools::izip;
use special::Gamma as _;

use crate::consts::HALF_LN_2PI;
use crate::dist::Dirichlet;
use crate::priors::Priors;
use crate::suffstats::WeightedGaussianStat;
use crate::traits::Entropy;

use super::{ComponentParams, Responsibilities};

/// Evidence lower bound of the current variational factors.
///
/// ```math
/// L = E[ln p(X | Z, μ, τ)] + E[ln p(Z | π)] + E[ln p(π)] + E[ln p(μ, τ)]
///     + H[q(Z)] + H[q(π)] + H[q(μ, τ)]
/// ```
///
/// `stats` must be the statistics of `resp`, and `params` and `mixing` the
/// factors computed from them.
pub fn elbo(
    priors: &Priors,
    params: &[ComponentParams],
    mixing: &Dirichlet,
    resp: &Responsibilities,
    stats: &[WeightedGaussianStat],
) -> f64 {
    let e_ln_pi = mixing.expected_ln_weights();

    let components: f64 = izip!(priors.components(), params, stats, &e_ln_pi)
        .map(|(prior, q, stat, &e_ln_pi)| {
            let noise = q.noise();
            let e_ln_tau = noise.expected_ln();
            let e_tau = q.e_precision();
            let nk = stat.n();

            // E[ln p(x | z, μ, τ)] + E[ln p(z | π)]
            let ln_lik = nk
                * (0.5_f64.mul_add(e_ln_tau, e_ln_pi)
                    - HALF_LN_2PI
                    - 0.5 * q.beta.recip())
                - 0.5 * e_tau * stat.scatter_about(q.m);

            // E[ln p(μ, τ)]
            let m0 = prior.level().mu();
            let beta0 = prior.level().precision();
            let a0 = prior.noise().shape();
            let b0 = prior.noise().rate();
            let dm = q.m - m0;
            let ln_prior = 0.5_f64.mul_add(beta0.ln(), -HALF_LN_2PI)
                + 0.5 * e_ln_tau
                - 0.5 * beta0 * e_tau.mul_add(dm * dm, q.beta.recip())
                + a0.mul_add(b0.ln(), -a0.ln_gamma().0)
                + (a0 - 1.0).mul_add(e_ln_tau, -b0 * e_tau);

            // H[q(μ, τ)] = H[q(τ)] + E[H[q(μ | τ)]]
            let entropy = noise.entropy() + 0.5 + HALF_LN_2PI
                - 0.5 * q.beta.ln()
                - 0.5 * e_ln_tau;

            ln_lik + ln_prior + entropy
        })
        .sum();

    // E[ln p(π)]
    let ln_prior_mixing = priors
        .mixing()
        .alphas()
        .iter()
        .zip(&e_ln_pi)
        .fold(priors.mixing().ln_norm(), |acc, (alpha, e_ln_pi)| {
            (alpha - 1.0).mul_add(*e_ln_pi, acc)
        });

    components + ln_prior_mixing + mixing.entropy() + resp.entropy()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::{Gamma, Gaussian};
    use crate::priors::ComponentPrior;
    use special::Gamma as _;

    // With one component and one observation the bound is tight: it equals
    // the log marginal likelihood of the Normal-Gamma model.
    #[test]
    fn single_point_bound_is_log_evidence() {
        let xs = [3.0];
        let priors = Priors::new(
            vec![ComponentPrior::new(
                Gaussian::from_mean_precision(1.0, 2.0).unwrap(),
                Gamma::new(2.0, 3.0).unwrap(),
            )],
            Dirichlet::new(vec![1.0]).unwrap(),
        )
        .unwrap();
        let params: Vec<ComponentParams> = priors
            .components()
            .iter()
            .map(ComponentParams::from_prior)
            .collect();
        let resp =
            Responsibilities::compute(&xs, &params, priors.mixing()).unwrap();
        let stats = resp.stats(&xs);
        let post: Vec<ComponentParams> = priors
            .components()
            .iter()
            .zip(&stats)
            .map(|(prior, stat)| ComponentParams::posterior(prior, stat))
            .collect();
        let mixing = Dirichlet::new(vec![2.0]).unwrap();

        let bound = elbo(&priors, &post, &mixing, &resp, &stats);

        // ln p(x) = ln Γ(aₙ) - ln Γ(a₀) + a₀ ln b₀ - aₙ ln bₙ
        //           + ½ ln(β₀ / βₙ) - ½ ln(2π)
        let q = &post[0];
        let ln_evidence = q.shape.ln_gamma().0 - 2.0_f64.ln_gamma().0
            + 2.0 * 3.0_f64.ln()
            - q.shape * q.rate.ln()
            + 0.5 * (2.0 / q.beta).ln()
            - HALF_LN_2PI;

        assert::close(bound, ln_evidence, 1E-10);
    }
}
