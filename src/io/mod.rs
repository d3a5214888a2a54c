//! Input/output, configuration and the ambient stack

/// Command-line parsing and dispatch
pub mod cli;
/// Defaults, constants and the validated run configuration
pub mod configuration;
/// Error types shared by every stage
pub mod error;
/// Raster loading and grayscale conversion
pub mod image;
/// Logger setup
pub mod logging;
/// Batch progress display
pub mod progress;
/// Delimited text tables
pub mod table;
