//! Re-imports for convenience
#[doc(no_inline)]
pub use crate::dist::*;
#[doc(no_inline)]
pub use crate::fit::{fit, fit_with_priors, Fit, FitConfig};
#[doc(no_inline)]
pub use crate::posterior::Posterior;
#[doc(no_inline)]
pub use crate::priors::{ComponentPrior, Priors};
#[doc(no_inline)]
pub use crate::result::{ConfigError, FitError};
#[doc(no_inline)]
pub use crate::traits::*;
