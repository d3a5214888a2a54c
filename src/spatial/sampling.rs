//! Mean raster intensity under a filled disk, clipped to the raster bounds

use crate::spatial::transform::PixelPosition;
use ndarray::ArrayView2;
use num_traits::ToPrimitive;

/// Samples a single-channel raster indexed `[row, col]`
pub struct IntensitySampler<'a, T> {
    raster: ArrayView2<'a, T>,
}

impl<'a, T> IntensitySampler<'a, T>
where
    T: ToPrimitive + Copy,
{
    /// Wrap a grayscale raster view
    pub const fn new(raster: ArrayView2<'a, T>) -> Self {
        Self { raster }
    }

    /// Raster size as (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        let (rows, cols) = self.raster.dim();
        (cols, rows)
    }

    /// Mean value under the disk at `position`, or `None` when no pixel of the
    /// disk lies inside the raster
    ///
    /// A pixel belongs to the disk when its squared distance from the centre
    /// is strictly below `radius²`; radii below 1 are treated as 1.
    ///
    /// Distances are computed in `i128`, so saturated coordinates from huge
    /// source values cannot overflow.
    pub fn sample(&self, position: PixelPosition) -> Option<f64> {
        let (rows, cols) = self.raster.dim();
        let (rows, cols) = (rows as i128, cols as i128);
        let (x, y) = (i128::from(position.x), i128::from(position.y));
        let radius = i128::from(position.radius.max(1));

        // Offsets of magnitude `radius` never satisfy the strict inequality
        let reach = radius - 1;
        let row_start = (y - reach).max(0);
        let row_end = (y + reach).min(rows - 1);
        let col_start = (x - reach).max(0);
        let col_end = (x + reach).min(cols - 1);

        let radius_squared = radius * radius;
        let mut sum = 0.0;
        let mut count = 0_usize;

        for row in row_start..=row_end {
            let dy = row - y;
            for col in col_start..=col_end {
                let dx = col - x;
                if dx * dx + dy * dy >= radius_squared {
                    continue;
                }
                if let Some(value) = self
                    .raster
                    .get((row as usize, col as usize))
                    .and_then(ToPrimitive::to_f64)
                {
                    sum += value;
                    count += 1;
                }
            }
        }

        (count > 0).then(|| sum / count as f64)
    }
}
