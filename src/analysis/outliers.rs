//! One-sided interquartile-range outlier rule, computed per sample

use crate::io::configuration::IQR_MULTIPLIER;
use crate::math::descriptive::{present, quantile_lower};
use bitvec::prelude::{BitVec, bitvec};

/// Quartiles and the derived upper bound of one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierBounds {
    /// 25th percentile
    pub q1: f64,
    /// 75th percentile
    pub q3: f64,
    /// `q3 - q1`
    pub iqr: f64,
    /// `q3 + 1.5 * iqr`
    pub upper: f64,
}

impl OutlierBounds {
    /// Bounds over the finite values of a sample, `None` if there are none
    ///
    /// Small samples still produce bounds; with fewer than four values they
    /// may be degenerate (e.g. `iqr == 0`).
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let q1 = quantile_lower(values, 0.25)?;
        let q3 = quantile_lower(values, 0.75)?;
        let iqr = q3 - q1;
        Some(Self {
            q1,
            q3,
            iqr,
            upper: IQR_MULTIPLIER.mul_add(iqr, q3),
        })
    }

    /// Whether a value lies strictly above the upper bound
    pub fn is_outlier(&self, value: f64) -> bool {
        value > self.upper
    }
}

/// Outlier mask for one discriminant column; missing values are never outliers
///
/// Only the upper tail is flagged: dim foci are kept as regular detections.
pub fn classify(values: &[Option<f64>]) -> (BitVec, Option<OutlierBounds>) {
    let Some(bounds) = OutlierBounds::from_values(&present(values)) else {
        return (bitvec![0; values.len()], None);
    };

    let mask = values
        .iter()
        .map(|v| v.is_some_and(|x| bounds.is_outlier(x)))
        .collect();
    (mask, Some(bounds))
}
