//! Stopping rule for the coordinate-ascent loop
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// What the inference loop should do after an iteration
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum Convergence {
    /// Run another iteration
    Continue,
    /// The ELBO stopped improving
    Converged,
    /// The iteration cap was hit before the ELBO settled
    MaxIterationsReached,
}

impl Convergence {
    /// `true` unless the decision is [`Convergence::Continue`]
    #[inline]
    pub fn is_done(&self) -> bool {
        !matches!(self, Convergence::Continue)
    }
}

/// Decide whether to stop given the ELBO after each completed iteration.
///
/// Converged once the last two values differ by no more than
/// `tol * |ELBO|`. Convergence wins over the cap when both hold.
///
/// # Example
///
/// ```
/// use supres::vb::{check, Convergence};
///
/// assert_eq!(check(&[-10.0], 200, 1E-6), Convergence::Continue);
/// assert_eq!(check(&[-10.0, -5.0], 200, 1E-6), Convergence::Continue);
/// assert_eq!(check(&[-10.0, -5.0, -5.0], 200, 1E-6), Convergence::Converged);
/// assert_eq!(check(&[-10.0, -5.0], 2, 1E-6), Convergence::MaxIterationsReached);
/// ```
pub fn check(trace: &[f64], max_iters: usize, tol: f64) -> Convergence {
    let converged = match trace {
        [.., prev, cur] => (cur - prev).abs() <= tol * cur.abs(),
        _ => false,
    };

    if converged {
        Convergence::Converged
    } else if trace.len() >= max_iters {
        Convergence::MaxIterationsReached
    } else {
        Convergence::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_trace_continues() {
        assert_eq!(check(&[], 10, 1E-6), Convergence::Continue);
    }

    #[test]
    fn single_value_never_converges() {
        assert_eq!(check(&[-1.0], 10, 1E-6), Convergence::Continue);
        assert_eq!(check(&[-1.0], 1, 1E-6), Convergence::MaxIterationsReached);
    }

    #[test]
    fn tolerance_is_relative() {
        // |Δ| = 1E-3, |L| = 1E4 -> relative change 1E-7
        let trace = [-20_000.0, -10_000.001, -10_000.0];
        assert_eq!(check(&trace, 200, 1E-6), Convergence::Converged);
        assert_eq!(check(&trace, 200, 1E-8), Convergence::Continue);
    }

    #[test]
    fn only_latest_change_matters() {
        let trace = [-5.0, -5.0, -4.0];
        assert_eq!(check(&trace, 200, 1E-6), Convergence::Continue);
    }

    #[test]
    fn cap_without_convergence() {
        let trace = [-3.0, -2.0, -1.0];
        assert_eq!(check(&trace, 3, 1E-6), Convergence::MaxIterationsReached);
        assert!(check(&trace, 3, 1E-6).is_done());
    }

    #[test]
    fn convergence_wins_at_cap() {
        let trace = [-3.0, -1.0, -1.0];
        assert_eq!(check(&trace, 3, 1E-6), Convergence::Converged);
    }

    #[test]
    fn zero_tolerance_needs_exact_repeat() {
        assert_eq!(check(&[-2.0, -2.0], 10, 0.0), Convergence::Converged);
        assert_eq!(
            check(&[-2.0, -2.0 + 1E-15], 10, 0.0),
            Convergence::Continue
        );
    }
}
