//! Sufficient statistics
mod gaussian;

pub use gaussian::WeightedGaussianStat;
