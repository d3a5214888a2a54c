//! Tests for the physical-plausibility pre-filter

#[cfg(test)]
mod tests {
    use fociquant::PipelineError;
    use fociquant::analysis::filter::FilterConfig;
    use fociquant::io::table::DelimitedTable;
    use std::path::Path;

    fn table(values: &[&str]) -> DelimitedTable {
        DelimitedTable::new(
            vec!["id".to_string(), "sigma [nm]".to_string()],
            values
                .iter()
                .enumerate()
                .map(|(i, v)| vec![i.to_string(), (*v).to_string()])
                .collect(),
        )
    }

    // Tests the strict floor and that missing values never pass
    // Verified by using a greater-or-equal comparison
    #[test]
    fn test_passes_is_strict() {
        let filter = FilterConfig::default();
        assert!((filter.floor - 75.0).abs() < f64::EPSILON);
        assert!(!filter.passes(Some(75.0)));
        assert!(filter.passes(Some(75.1)));
        assert!(!filter.passes(None));
    }

    // Tests row selection keeps source order and leaves the input untouched
    // Verified by filtering the input table in place
    #[test]
    fn test_apply_selects_rows() {
        let input = table(&["80", "10", "", "NA", "120", "75"]);
        let filter = FilterConfig::default();

        let filtered = filter
            .apply(&input, Path::new("sample.csv"))
            .expect("Failed to apply filter");

        let ids = filtered.text_column("id").unwrap_or_default();
        assert_eq!(ids, vec!["0", "4"]);
        assert_eq!(input.len(), 6);
    }

    // Tests a configurable discriminant column
    // Verified by hard-coding the sigma column
    #[test]
    fn test_apply_custom_column_and_missing_column() {
        let input = table(&["80", "90"]);
        let by_id = FilterConfig {
            column: "id".to_string(),
            floor: 0.0,
        };
        let filtered = by_id
            .apply(&input, Path::new("sample.csv"))
            .expect("Failed to apply filter");
        assert_eq!(filtered.len(), 1);

        let missing = FilterConfig {
            column: "width".to_string(),
            floor: 0.0,
        };
        assert!(matches!(
            missing.apply(&input, Path::new("sample.csv")),
            Err(PipelineError::SchemaMismatch { .. })
        ));
    }
}
