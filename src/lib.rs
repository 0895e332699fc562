//! Support and resistance price levels from variational Bayes.
//!
//! Prices are modeled as draws from a one-dimensional Gaussian mixture. Each
//! component is a price level with its own unknown noise precision, and the
//! mixing proportions are unknown too. Conjugate priors (Normal-Gamma per
//! level, Dirichlet over the mixing weights) are updated by mean-field
//! coordinate ascent until the evidence lower bound stops improving.
//!
//! # Example
//!
//! ```
//! use supres::{fit, FitConfig};
//!
//! let prices = [
//!     99.8, 100.1, 100.0, 99.9, 100.2, 110.2, 109.9, 110.0, 110.1, 109.8,
//! ];
//! let result = fit(&prices, 2, &FitConfig::default()).unwrap();
//!
//! assert!(result.converged);
//! let levels = result.posterior.sorted_by_mean();
//! assert!(levels[0].0 < levels[1].0);
//! ```
pub mod consts;
pub mod dist;
pub mod fit;
pub mod io;
pub mod misc;
pub mod posterior;
pub mod prelude;
pub mod priors;
pub mod result;
pub mod suffstats;
pub mod traits;
pub mod vb;

pub use fit::{fit, fit_with_priors, Fit, FitConfig};
pub use result::{ConfigError, FitError};

/// Implements `Display` for a type in terms of its `From<&T> for String`
#[macro_export]
macro_rules! impl_display {
    ($kind: ty) => {
        impl ::std::fmt::Display for $kind {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                write!(f, "{}", String::from(self))
            }
        }
    };
}
