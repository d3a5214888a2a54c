//! Foci quantification pipeline for microscopy batches
//!
//! Image, ROI-archive and localization-table files are grouped by a normalized
//! sample key. Localizations are mapped into raster pixels to sample local
//! intensity, filtered, classified for outliers and summarised per sample,
//! then merged with nucleus measurements and correlated.

#![forbid(unsafe_code)]

/// Pre-filter, outlier rule, summaries, aggregation and correlation
pub mod analysis;
/// Input/output operations, configuration and error handling
pub mod io;
/// Descriptive statistics, ranks and significance tests
pub mod math;
/// Sample keys, directory listings and file correspondence
pub mod matching;
/// Per-sample processing and batch orchestration
pub mod pipeline;
/// Coordinate calibration and raster sampling
pub mod spatial;

pub use io::error::{PipelineError, Result};
