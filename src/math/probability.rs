//! Significance of rank correlations

use statrs::distribution::{ContinuousCDF, StudentsT};

/// Two-sided tail probability of Student's t with `degrees_of_freedom`
///
/// Returns `None` for non-positive degrees of freedom or a NaN statistic.
pub fn student_t_two_sided(t: f64, degrees_of_freedom: f64) -> Option<f64> {
    if t.is_nan() || degrees_of_freedom <= 0.0 {
        return None;
    }
    if t.is_infinite() {
        return Some(0.0);
    }
    let distribution = StudentsT::new(0.0, 1.0, degrees_of_freedom).ok()?;
    Some((2.0 * distribution.sf(t.abs())).clamp(0.0, 1.0))
}

/// Two-sided p-value for a correlation `r` over `n` paired observations
///
/// Uses `t = r * sqrt((n - 2) / (1 - r²))` with `n - 2` degrees of freedom;
/// a perfect correlation has p = 0.
pub fn correlation_p_value(r: f64, n: usize) -> Option<f64> {
    if r.is_nan() || n < 3 {
        return None;
    }
    let degrees_of_freedom = (n - 2) as f64;
    let remainder = (1.0 - r) * (1.0 + r);
    if remainder <= 0.0 {
        return Some(0.0);
    }
    let t = r * (degrees_of_freedom / remainder).sqrt();
    student_t_two_sided(t, degrees_of_freedom)
}
