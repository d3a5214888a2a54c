//! Coordinate transforms and raster sampling
//!
//! This module contains the geometric half of the per-sample stage:
//! - Calibration of localization coordinates against a target raster
//! - Disk-mask intensity sampling with bounds clipping

/// Filled-disk intensity sampling
pub mod sampling;
/// Nanometre to pixel conversion under a unified calibration
pub mod transform;

pub use sampling::IntensitySampler;
pub use transform::{Calibration, Localization, PixelMapping, PixelPosition};
