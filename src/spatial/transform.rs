//! Mapping localizations from nanometres into pixels of a (possibly rescaled) raster
//!
//! Two calibration sources exist upstream: a ratio between the raster's
//! current size and the nominal size used during localization, or explicit
//! physical pixel sizes for both coordinate spaces. They describe the same
//! quantity: the ratio model is the physical model with
//! `raster nm/px = localization nm/px * nominal / current`. Both resolve into
//! one [`PixelMapping`], which performs every conversion.

use crate::io::configuration::{DEFAULT_LOCALIZATION_PIXEL_SIZE_NM, DEFAULT_NOMINAL_SIZE};
use crate::io::error::{Result, invalid_parameter};

/// One detected event in physical units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Localization {
    /// x position in nanometres
    pub x_nm: f64,
    /// y position in nanometres
    pub y_nm: f64,
    /// Fitted width in nanometres
    pub sigma_nm: f64,
}

/// Integer disk centre and radius in raster pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelPosition {
    /// Column index (may lie outside the raster)
    pub x: i64,
    /// Row index (may lie outside the raster)
    pub y: i64,
    /// Disk radius, at least 1
    pub radius: i64,
}

/// How localization coordinates relate to the target raster
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Calibration {
    /// Scale by current / nominal raster size; sigma follows the x-axis ratio
    Ratio {
        /// Nanometres per pixel of the localization raster
        localization_px_nm: f64,
        /// Raster (width, height) used during localization
        nominal_size: (u32, u32),
    },
    /// Scale by localization nm/px over raster nm/px; sigma uses the mean ratio
    Physical {
        /// Nanometres per pixel of the localization raster (x, y)
        localization_px_nm: (f64, f64),
        /// Nanometres per pixel of the target raster (x, y)
        raster_px_nm: (f64, f64),
    },
}

impl Default for Calibration {
    fn default() -> Self {
        Self::Ratio {
            localization_px_nm: DEFAULT_LOCALIZATION_PIXEL_SIZE_NM,
            nominal_size: DEFAULT_NOMINAL_SIZE,
        }
    }
}

fn require_positive(parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid_parameter(
            parameter,
            &value,
            &"must be a positive finite number",
        ))
    }
}

impl Calibration {
    /// Check every size and pixel size is usable
    ///
    /// # Errors
    ///
    /// Returns [`crate::PipelineError::InvalidParameter`] for zero nominal
    /// dimensions or non-positive pixel sizes
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Ratio {
                localization_px_nm,
                nominal_size: (width, height),
            } => {
                require_positive("localization_pixel_size", localization_px_nm)?;
                if width == 0 || height == 0 {
                    return Err(invalid_parameter(
                        "nominal_size",
                        &format!("{width}x{height}"),
                        &"dimensions must be non-zero",
                    ));
                }
                Ok(())
            }
            Self::Physical {
                localization_px_nm: (loc_x, loc_y),
                raster_px_nm: (raster_x, raster_y),
            } => {
                require_positive("localization_pixel_size_x", loc_x)?;
                require_positive("localization_pixel_size_y", loc_y)?;
                require_positive("raster_pixel_size_x", raster_x)?;
                require_positive("raster_pixel_size_y", raster_y)
            }
        }
    }

    /// Resolve against a raster of `(width, height)` pixels
    ///
    /// # Errors
    ///
    /// Returns an error if the calibration is invalid or the raster is empty
    pub fn resolve(&self, raster_size: (usize, usize)) -> Result<PixelMapping> {
        self.validate()?;
        let (width, height) = raster_size;
        if width == 0 || height == 0 {
            return Err(invalid_parameter(
                "raster_size",
                &format!("{width}x{height}"),
                &"raster has no pixels",
            ));
        }

        let mapping = match *self {
            Self::Ratio {
                localization_px_nm,
                nominal_size: (nominal_width, nominal_height),
            } => {
                let scale_x = width as f64 / f64::from(nominal_width);
                let scale_y = height as f64 / f64::from(nominal_height);
                PixelMapping {
                    nm_per_px: (localization_px_nm, localization_px_nm),
                    axis_scale: (scale_x, scale_y),
                    sigma_scale: scale_x,
                }
            }
            Self::Physical {
                localization_px_nm: (loc_x, loc_y),
                raster_px_nm: (raster_x, raster_y),
            } => {
                let scale_x = loc_x / raster_x;
                let scale_y = loc_y / raster_y;
                PixelMapping {
                    nm_per_px: (loc_x, loc_y),
                    axis_scale: (scale_x, scale_y),
                    sigma_scale: f64::midpoint(scale_x, scale_y),
                }
            }
        };

        Ok(mapping)
    }
}

/// Resolved conversion from nanometres to target-raster pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelMapping {
    /// Nanometres per pixel of the localization space (x, y)
    pub nm_per_px: (f64, f64),
    /// Localization pixels to raster pixels (x, y)
    pub axis_scale: (f64, f64),
    /// Localization pixels to raster pixels for the radius
    pub sigma_scale: f64,
}

// Half-to-even, matching the rounding the upstream exporters use
fn round_to_pixel(value: f64) -> i64 {
    value.round_ties_even() as i64
}

impl PixelMapping {
    /// Convert one localization; no bounds checking, radius clamped to at least 1
    pub fn to_pixel(&self, localization: &Localization) -> PixelPosition {
        let (nm_x, nm_y) = self.nm_per_px;
        let (scale_x, scale_y) = self.axis_scale;

        let x = round_to_pixel(localization.x_nm / nm_x * scale_x);
        let y = round_to_pixel(localization.y_nm / nm_y * scale_y);
        let radius = round_to_pixel(localization.sigma_nm / nm_x * self.sigma_scale).max(1);

        PixelPosition { x, y, radius }
    }
}
