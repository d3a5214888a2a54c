//! Raster loading into single-channel luminance arrays

use crate::io::error::{PipelineError, Result};
use image::{DynamicImage, GenericImageView};
use ndarray::Array2;
use std::path::Path;

/// Luminance weights (R, G, B) applied to [0, 1] channel values
pub const LUMINANCE_WEIGHTS: [f64; 3] = [0.2125, 0.7154, 0.0721];

/// Convert a decoded image to grayscale, indexed `[row, col]`
///
/// Channel values are normalised to [0, 1] regardless of the source bit
/// depth, so 8-bit and 16-bit rasters sample on the same scale.
pub fn to_grayscale(image: &DynamicImage) -> Array2<f64> {
    let (width, height) = image.dimensions();
    let rgb = image.to_rgb32f();
    let mut gray = Array2::zeros((height as usize, width as usize));

    for (x, y, pixel) in rgb.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let value = LUMINANCE_WEIGHTS[0].mul_add(
            f64::from(r),
            LUMINANCE_WEIGHTS[1].mul_add(f64::from(g), LUMINANCE_WEIGHTS[2] * f64::from(b)),
        );
        if let Some(cell) = gray.get_mut((y as usize, x as usize)) {
            *cell = value;
        }
    }

    gray
}

/// Decode a raster file and convert it to grayscale
///
/// # Errors
///
/// Returns [`PipelineError::ImageLoad`] if the file cannot be opened or decoded
pub fn load_grayscale(path: &Path) -> Result<Array2<f64>> {
    let image = image::open(path).map_err(|source| PipelineError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(to_grayscale(&image))
}
