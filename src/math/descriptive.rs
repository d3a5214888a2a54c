//! Descriptive statistics over optional samples

/// Finite values of a column in original order
pub fn present(values: &[Option<f64>]) -> Vec<f64> {
    values
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .collect()
}

/// Arithmetic mean of finite values, `None` when there are none
pub fn mean(values: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    Some(finite.iter().sum::<f64>() / finite.len() as f64)
}

/// Mean of the present values of an optional column
pub fn mean_present(values: &[Option<f64>]) -> Option<f64> {
    mean(&present(values))
}

/// Percentile by the lower-index rule: the sorted value at `floor((n - 1) * q)`
///
/// `q` is clamped to [0, 1]; non-finite values are ignored. Returns `None`
/// for an empty sample.
pub fn quantile_lower(values: &[f64], q: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let q = if q.is_nan() { 0.0 } else { q.clamp(0.0, 1.0) };
    let index = ((sorted.len() - 1) as f64 * q).floor() as usize;
    sorted.get(index).copied()
}
