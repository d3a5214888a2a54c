//! Numerical helpers shared by the analysis stages

/// Means and the lower-index percentile rule
pub mod descriptive;
/// Student-t significance for correlations
pub mod probability;
/// Average ranks and correlation coefficients
pub mod ranking;
