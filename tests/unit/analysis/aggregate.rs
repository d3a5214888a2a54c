//! Tests for the nucleus and foci left join

#[cfg(test)]
mod tests {
    use fociquant::PipelineError;
    use fociquant::analysis::aggregate::{MergedRow, NucleusSummary, aggregate};
    use fociquant::analysis::summary::FociSummary;
    use fociquant::io::table::DelimitedTable;
    use fociquant::matching::key::{SampleKey, normalize};
    use std::path::Path;

    fn nucleus(key: &str, area: f64) -> NucleusSummary {
        NucleusSummary {
            sample_key: normalize(key),
            nucleus_area: Some(area),
            nucleus_mean_intensity: Some(area / 10.0),
        }
    }

    fn foci(key: &str, count: usize) -> FociSummary {
        FociSummary {
            sample_key: normalize(key),
            foci_count: count,
            mean_intensity_photons: Some(500.0),
            mean_intensity_px: Some(0.25),
            mean_sigma_nm: Some(110.0),
            outlier_count: Some(0),
            outlier_mean_intensity_px: None,
            outlier_mean_sigma_nm: None,
        }
    }

    // Tests that unmatched nucleus rows survive with missing foci fields
    // Verified by using an inner join
    #[test]
    fn test_unmatched_nucleus_keeps_null_fields() {
        let merged = aggregate(&[nucleus("a", 100.0), nucleus("b", 200.0)], &[foci("a", 4)]);

        assert_eq!(merged.len(), 2);
        let unmatched = merged.get(1).expect("Failed to find unmatched row");
        assert!(unmatched.foci.is_none());

        let values = unmatched.numeric_values();
        assert_eq!(values.first().copied().flatten(), Some(200.0));
        assert!(values.iter().skip(2).all(Option::is_none));

        let record = unmatched.to_record();
        assert_eq!(record.len(), MergedRow::HEADERS.len());
        assert_eq!(record.get(3).map(String::as_str), Some(""));
    }

    // Tests that a zero count stays distinct from a missing summary
    // Verified by defaulting missing summaries to zero
    #[test]
    fn test_zero_count_is_not_null() {
        let merged = aggregate(&[nucleus("a", 1.0)], &[foci("a", 0)]);
        let record = merged.first().map(MergedRow::to_record).unwrap_or_default();
        assert_eq!(record.get(3).map(String::as_str), Some("0"));
    }

    // Tests row repetition for duplicate foci keys and nucleus order
    // Verified by keeping only the first foci summary per key
    #[test]
    fn test_duplicate_foci_keys_repeat_nucleus() {
        let nuclei = [nucleus("b", 2.0), nucleus("a", 1.0), nucleus("a", 3.0)];
        let summaries = [foci("a", 1), foci("a", 2)];

        let merged = aggregate(&nuclei, &summaries);

        let layout: Vec<(String, Option<f64>, Option<usize>)> = merged
            .iter()
            .map(|row| {
                (
                    row.nucleus.sample_key.to_string(),
                    row.nucleus.nucleus_area,
                    row.foci.as_ref().map(|f| f.foci_count),
                )
            })
            .collect();
        assert_eq!(
            layout,
            vec![
                ("b".to_string(), Some(2.0), None),
                ("a".to_string(), Some(1.0), Some(1)),
                ("a".to_string(), Some(1.0), Some(2)),
                ("a".to_string(), Some(3.0), Some(1)),
                ("a".to_string(), Some(3.0), Some(2)),
            ]
        );
    }

    // Tests nucleus table loading with coercion and schema checks
    // Verified by failing on unparsable cells
    #[test]
    fn test_nucleus_summary_from_table() {
        let key = SampleKey::from_path(Path::new("C1_sample_rois.csv"));
        let table = DelimitedTable::new(
            vec![" Area ".to_string(), "Mean".to_string(), "Label".to_string()],
            vec![
                vec!["120.5".to_string(), "NA".to_string(), "n1".to_string()],
                vec!["abc".to_string(), "33".to_string(), "n2".to_string()],
            ],
        );

        let rows = NucleusSummary::from_table(&key, &table, Path::new("nuclei.csv"))
            .expect("Failed to read nucleus table");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.first().and_then(|r| r.nucleus_area), Some(120.5));
        assert_eq!(rows.first().and_then(|r| r.nucleus_mean_intensity), None);
        assert_eq!(rows.get(1).and_then(|r| r.nucleus_area), None);
        assert!(rows.iter().all(|r| r.sample_key.as_str() == "sample"));

        let no_mean = DelimitedTable::new(vec!["Area".to_string()], Vec::new());
        assert!(matches!(
            NucleusSummary::from_table(&key, &no_mean, Path::new("nuclei.csv")),
            Err(PipelineError::SchemaMismatch { .. })
        ));
    }
}
