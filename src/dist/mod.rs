//! Probability distributions
mod dirichlet;
mod gamma;
mod gaussian;
mod mixture;

pub use dirichlet::{Dirichlet, DirichletError};
pub use gamma::{Gamma, GammaError};
pub use gaussian::{Gaussian, GaussianError};
pub use mixture::{Mixture, MixtureError};
