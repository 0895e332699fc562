use tracing::{debug, info, warn};

use crate::dist::Dirichlet;
use crate::fit::FitConfig;
use crate::posterior::Posterior;
use crate::priors::Priors;
use crate::result::{FitError, Result, Stage};

use super::convergence::{check, Convergence};
use super::elbo::elbo;
use super::{ComponentParams, Responsibilities};

// Relative ELBO drop tolerated as rounding before it is reported
const ELBO_DROP_TOL: f64 = 1E-10;

/// Mean-field coordinate ascent over q(Z) q(π) Πₖ q(μₖ, τₖ).
///
/// The engine is the caller-owned context of a single run. It borrows the
/// observations and priors, owns the current variational factors, and keeps
/// the ELBO after every iteration.
///
/// # Example
///
/// ```
/// use supres::fit::FitConfig;
/// use supres::priors::Priors;
/// use supres::vb::{Convergence, VbEngine};
///
/// let xs = [99.8, 100.1, 100.0, 110.2, 109.9, 110.0];
/// let priors = Priors::from_data(&xs, 2).unwrap();
/// let mut engine = VbEngine::new(&xs, &priors);
///
/// let decision = engine.run(&FitConfig::default()).unwrap();
/// assert_eq!(decision, Convergence::Converged);
///
/// let posterior = engine.posterior();
/// assert!(posterior.means()[0] < 101.0);
/// assert!(posterior.means()[1] > 108.0);
/// ```
#[derive(Debug, Clone)]
pub struct VbEngine<'a> {
    xs: &'a [f64],
    priors: &'a Priors,
    params: Vec<ComponentParams>,
    mixing: Dirichlet,
    resp: Option<Responsibilities>,
    elbo: Vec<f64>,
}

impl<'a> VbEngine<'a> {
    /// Initialize every variational factor at its prior.
    pub fn new(xs: &'a [f64], priors: &'a Priors) -> Self {
        let params = priors
            .components()
            .iter()
            .map(ComponentParams::from_prior)
            .collect();

        VbEngine {
            xs,
            priors,
            params,
            mixing: priors.mixing().clone(),
            resp: None,
            elbo: Vec::new(),
        }
    }

    /// Number of completed iterations
    #[inline]
    pub fn n_iters(&self) -> usize {
        self.elbo.len()
    }

    /// ELBO after each completed iteration
    #[inline]
    pub fn elbo_trace(&self) -> &[f64] {
        &self.elbo
    }

    /// Responsibilities from the latest iteration. `None` before the first.
    #[inline]
    pub fn responsibilities(&self) -> Option<&Responsibilities> {
        self.resp.as_ref()
    }

    /// Current component factors
    #[inline]
    pub fn params(&self) -> &[ComponentParams] {
        &self.params
    }

    /// Current mixing factor
    #[inline]
    pub fn mixing(&self) -> &Dirichlet {
        &self.mixing
    }

    /// Run one synchronous sweep and return its ELBO.
    ///
    /// Responsibilities come from the previous factors; every factor is then
    /// replaced from the new responsibilities. On error the engine keeps the
    /// factors of the last good iteration.
    pub fn step(&mut self) -> Result<f64> {
        let iter = self.n_iters() + 1;
        let unstable = |stage| FitError::NumericInstability { iter, stage };

        let resp =
            Responsibilities::compute(self.xs, &self.params, &self.mixing)
                .ok_or_else(|| unstable(Stage::Responsibilities))?;

        let stats = resp.stats(self.xs);

        let params: Vec<ComponentParams> = self
            .priors
            .components()
            .iter()
            .zip(stats.iter())
            .map(|(prior, stat)| ComponentParams::posterior(prior, stat))
            .collect();

        if !params.iter().all(ComponentParams::is_valid) {
            return Err(unstable(Stage::Parameters));
        }

        let alphas = self
            .priors
            .mixing()
            .alphas()
            .iter()
            .zip(stats.iter())
            .map(|(alpha, stat)| alpha + stat.n())
            .collect();
        let mixing =
            Dirichlet::new(alphas).map_err(|_| unstable(Stage::Parameters))?;

        let bound = elbo(self.priors, &params, &mixing, &resp, &stats);
        if !bound.is_finite() {
            return Err(unstable(Stage::Elbo));
        }

        if let Some(&prev) = self.elbo.last() {
            if bound < prev - ELBO_DROP_TOL * prev.abs() {
                warn!(iter, prev, elbo = bound, "ELBO decreased");
            }
            debug!(iter, elbo = bound, delta = bound - prev, "vb iteration");
        } else {
            debug!(iter, elbo = bound, "vb iteration");
        }

        self.params = params;
        self.mixing = mixing;
        self.resp = Some(resp);
        self.elbo.push(bound);

        Ok(bound)
    }

    /// Iterate until the ELBO settles or the iteration cap is hit.
    ///
    /// Hitting the cap is reported through the returned [`Convergence`],
    /// not as an error.
    pub fn run(&mut self, config: &FitConfig) -> Result<Convergence> {
        loop {
            self.step()?;
            let decision =
                check(&self.elbo, config.max_iters(), config.tol());

            match decision {
                Convergence::Continue => continue,
                Convergence::Converged => {
                    info!(iters = self.n_iters(), "vb converged");
                }
                Convergence::MaxIterationsReached => {
                    warn!(
                        iters = self.n_iters(),
                        tol = config.tol(),
                        "vb stopped at the iteration cap before converging"
                    );
                }
            }
            return Ok(decision);
        }
    }

    /// Detached snapshot of the current factors
    pub fn posterior(&self) -> Posterior {
        Posterior::new(self.params.clone(), self.mixing.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_levels() -> Vec<f64> {
        vec![
            99.5, 100.2, 100.0, 99.9, 100.4, 109.8, 110.1, 110.3, 109.7, 110.0,
        ]
    }

    #[test]
    fn new_engine_starts_at_prior() {
        let xs = two_levels();
        let priors = Priors::from_data(&xs, 2).unwrap();
        let engine = VbEngine::new(&xs, &priors);

        assert_eq!(engine.n_iters(), 0);
        assert!(engine.responsibilities().is_none());
        assert_eq!(engine.mixing(), priors.mixing());
        assert_eq!(engine.params()[0].m, priors.components()[0].level().mu());
    }

    #[test]
    fn step_records_elbo_and_responsibilities() {
        let xs = two_levels();
        let priors = Priors::from_data(&xs, 2).unwrap();
        let mut engine = VbEngine::new(&xs, &priors);

        let bound = engine.step().unwrap();
        assert_eq!(engine.elbo_trace(), &[bound]);
        assert_eq!(engine.responsibilities().unwrap().n(), xs.len());
    }

    #[test]
    fn elbo_never_decreases() {
        let xs = two_levels();
        let priors = Priors::from_data(&xs, 3).unwrap();
        let mut engine = VbEngine::new(&xs, &priors);
        for _ in 0..50 {
            engine.step().unwrap();
        }

        engine.elbo_trace().windows(2).for_each(|w| {
            assert!(w[1] >= w[0] - 1E-9 * w[0].abs(), "{} -> {}", w[0], w[1]);
        });
    }

    #[test]
    fn mixing_concentrations_track_counts() {
        let xs = two_levels();
        let priors = Priors::from_data(&xs, 2).unwrap();
        let mut engine = VbEngine::new(&xs, &priors);
        engine.step().unwrap();

        let total: f64 = engine.mixing().sum_alpha();
        assert::close(total, 1.0 + xs.len() as f64, 1E-9);
    }

    #[test]
    fn run_stops_at_cap() {
        let xs = two_levels();
        let priors = Priors::from_data(&xs, 2).unwrap();
        let mut engine = VbEngine::new(&xs, &priors);

        let config = FitConfig::default().with_max_iters(1);
        let decision = engine.run(&config).unwrap();
        assert_eq!(decision, Convergence::MaxIterationsReached);
        assert_eq!(engine.n_iters(), 1);
    }

    #[test]
    fn failed_step_keeps_last_good_state() {
        let xs = [-1E300, 1E300];
        let priors = Priors::from_data(&xs, 2).unwrap();
        let mut engine = VbEngine::new(&xs, &priors);

        let err = engine.step().unwrap_err();
        assert_eq!(
            err,
            FitError::NumericInstability {
                iter: 1,
                stage: Stage::Responsibilities
            }
        );
        assert_eq!(engine.n_iters(), 0);
        assert_eq!(engine.mixing(), priors.mixing());
    }
}
