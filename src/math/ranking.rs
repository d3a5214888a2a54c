//! Ranks with tie averaging and product-moment correlation

use statrs::statistics::{Data, OrderStatistics, RankTieBreaker};

/// One-based ranks; tied values share the mean of the ranks they span
///
/// Returns `None` if any value is NaN, which has no place in an ordering.
pub fn average_ranks(values: &[f64]) -> Option<Vec<f64>> {
    if values.iter().any(|v| v.is_nan()) {
        return None;
    }
    Some(Data::new(values.to_vec()).ranks(RankTieBreaker::Average))
}

/// Pearson correlation, `None` for mismatched lengths, fewer than two
/// points or a zero-variance input
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance_x = 0.0;
    let mut variance_y = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }

    let denominator = (variance_x * variance_y).sqrt();
    if denominator <= 0.0 || !denominator.is_finite() {
        return None;
    }
    Some((covariance / denominator).clamp(-1.0, 1.0))
}

/// Spearman's rank correlation: Pearson correlation of average ranks
pub fn spearman(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() {
        return None;
    }
    pearson(&average_ranks(x)?, &average_ranks(y)?)
}
