//! Variational Bayes for the one-dimensional Gaussian mixture
//!
//! Each iteration recomputes the responsibilities from the current factors,
//! reduces them to per-component weighted statistics, and replaces every
//! factor with its closed-form conjugate update.
mod convergence;
mod elbo;
mod engine;
mod params;
mod responsibilities;

pub use convergence::{check, Convergence};
pub use elbo::elbo;
pub use engine::VbEngine;
pub use params::ComponentParams;
pub use responsibilities::Responsibilities;
