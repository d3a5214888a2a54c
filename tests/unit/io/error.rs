//! Tests for error display and path context

#[cfg(test)]
mod tests {
    use fociquant::PipelineError;
    use fociquant::io::error::{WithPath, input_missing, invalid_parameter};
    use std::error::Error;
    use std::io;
    use std::path::{Path, PathBuf};

    // Tests that messages name the offending path or parameter
    // Verified by omitting the path from the display output
    #[test]
    fn test_display_names_context() {
        let missing = input_missing(Path::new("images"), &"no images found");
        assert_eq!(missing.to_string(), "Missing input 'images': no images found");

        let invalid = invalid_parameter("filter_floor", &f64::NAN, &"must be a finite number");
        assert_eq!(
            invalid.to_string(),
            "Invalid parameter 'filter_floor' = 'NaN': must be a finite number"
        );

        let schema = PipelineError::SchemaMismatch {
            path: PathBuf::from("t.csv"),
            column: "Area".to_string(),
            available: vec!["Mean".to_string(), "Label".to_string()],
        };
        assert_eq!(
            schema.to_string(),
            "Table 't.csv' has no column 'Area' (found: Mean, Label)"
        );
        assert!(schema.source().is_none());
    }

    // Tests that wrapped I/O errors keep their source and operation
    // Verified by dropping the source error
    #[test]
    fn test_with_path_wraps_io_errors() {
        let raw: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let wrapped = raw.with_path(Path::new("out/results.csv"), "write table");

        let error = wrapped.expect_err("Failed to wrap error");
        assert!(matches!(
            error,
            PipelineError::FileSystem {
                operation: "write table",
                ..
            }
        ));
        assert!(error.source().is_some());
        assert!(error.to_string().contains("out/results.csv"));
    }
}
