//! Tests for the one-sided IQR outlier rule

#[cfg(test)]
mod tests {
    use fociquant::analysis::outliers::{OutlierBounds, classify};

    // Tests the reference sample where only the extreme value is flagged
    // Verified by computing quartiles with linear interpolation
    #[test]
    fn test_classify_reference_sample() {
        let values: Vec<Option<f64>> = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 100.0]
            .into_iter()
            .map(Some)
            .collect();

        let (mask, bounds) = classify(&values);

        let bounds = bounds.expect("Failed to compute bounds");
        assert!((bounds.q1 - 2.0).abs() < f64::EPSILON);
        assert!((bounds.q3 - 5.0).abs() < f64::EPSILON);
        assert!((bounds.iqr - 3.0).abs() < f64::EPSILON);
        assert!((bounds.upper - 9.5).abs() < f64::EPSILON);
        let flagged: Vec<usize> = mask.iter_ones().collect();
        assert_eq!(flagged, vec![6]);
    }

    // Tests that the rule is one-sided
    // Verified by adding a symmetric lower bound
    #[test]
    fn test_low_values_never_flagged() {
        let values = [Some(-1000.0), Some(10.0), Some(11.0), Some(12.0), Some(13.0)];
        let (mask, _) = classify(&values);
        assert_eq!(mask.count_ones(), 0);
    }

    // Tests missing values and degenerate samples
    // Verified by treating missing values as zero
    #[test]
    fn test_missing_and_degenerate_samples() {
        let (mask, bounds) = classify(&[None, None]);
        assert_eq!(mask.len(), 2);
        assert_eq!(mask.count_ones(), 0);
        assert!(bounds.is_none());

        let (tied_mask, tied_bounds) = classify(&[Some(5.0), None, Some(5.0), Some(6.0)]);
        assert!(tied_bounds.is_some_and(|b| b.iqr.abs() < f64::EPSILON));
        let flagged: Vec<usize> = tied_mask.iter_ones().collect();
        assert_eq!(flagged, vec![3]);
    }

    // Tests the bound is exclusive
    // Verified by flagging values equal to the bound
    #[test]
    fn test_bound_is_exclusive() {
        let bounds = OutlierBounds::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 100.0])
            .expect("Failed to compute bounds");
        assert!(!bounds.is_outlier(9.5));
        assert!(bounds.is_outlier(9.6));
    }
}
