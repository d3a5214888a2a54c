//! Quantitative stages applied after intensity sampling

/// Left join of nucleus and foci summaries
pub mod aggregate;
/// Pairwise Spearman correlation over numeric columns
pub mod correlation;
/// Physical-plausibility pre-filter
pub mod filter;
/// One-sided IQR outlier classification
pub mod outliers;
/// Per-sample foci summaries
pub mod summary;
