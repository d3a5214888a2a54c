//! Tests for raster loading and grayscale conversion

#[cfg(test)]
mod tests {
    use fociquant::PipelineError;
    use fociquant::io::image::{LUMINANCE_WEIGHTS, load_grayscale, to_grayscale};
    use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
    use std::path::Path;
    use tempfile::TempDir;

    // Tests luminance weighting of pure channels
    // Verified by averaging the three channels
    #[test]
    fn test_to_grayscale_weights_channels() {
        let mut rgb = RgbImage::new(3, 1);
        rgb.put_pixel(0, 0, Rgb([255, 0, 0]));
        rgb.put_pixel(1, 0, Rgb([0, 255, 0]));
        rgb.put_pixel(2, 0, Rgb([0, 0, 255]));

        let gray = to_grayscale(&DynamicImage::ImageRgb8(rgb));

        assert_eq!(gray.dim(), (1, 3));
        for (col, weight) in LUMINANCE_WEIGHTS.iter().enumerate() {
            let value = gray.get((0, col)).copied().unwrap_or_default();
            assert!((value - weight).abs() < 1e-6, "column {col}: {value}");
        }
    }

    // Tests that 8-bit and 16-bit rasters share the [0, 1] scale
    // Verified by returning raw channel values
    #[test]
    fn test_bit_depths_normalised() {
        let eight = DynamicImage::ImageLuma8(GrayImage::from_pixel(2, 2, Luma([255])));
        let sixteen: ImageBuffer<Luma<u16>, Vec<u16>> =
            ImageBuffer::from_pixel(2, 2, Luma([u16::MAX]));

        let a = to_grayscale(&eight);
        let b = to_grayscale(&DynamicImage::ImageLuma16(sixteen));
        for value in a.iter().chain(b.iter()) {
            assert!((value - 1.0).abs() < 1e-6);
        }
    }

    // Tests row-major indexing of a decoded file
    // Verified by transposing the array
    #[test]
    fn test_load_grayscale_from_file() -> std::io::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("sample.png");
        let mut raster = GrayImage::new(4, 2);
        raster.put_pixel(3, 1, Luma([255]));
        raster
            .save(&path)
            .map_err(|e| std::io::Error::other(e.to_string()))?;

        let gray = load_grayscale(&path).expect("Failed to load raster");
        assert_eq!(gray.dim(), (2, 4));
        assert!(gray.get((1, 3)).is_some_and(|v| (v - 1.0).abs() < 1e-6));
        assert!(gray.get((0, 0)).is_some_and(|v| v.abs() < 1e-12));
        Ok(())
    }

    // Tests decoding failures
    // Verified by returning an empty raster on failure
    #[test]
    fn test_load_grayscale_errors() {
        assert!(matches!(
            load_grayscale(Path::new("/nonexistent/sample.tif")),
            Err(PipelineError::ImageLoad { .. })
        ));
    }
}
