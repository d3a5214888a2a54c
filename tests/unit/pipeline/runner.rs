//! Tests for batch orchestration

#[cfg(test)]
mod tests {
    use fociquant::PipelineError;
    use fociquant::io::configuration::PipelineConfig;
    use fociquant::io::table::DelimitedTable;
    use fociquant::pipeline::runner::{load_nucleus_summaries, pair_directory};
    use fociquant::pipeline::{PipelineRunner, RunSummary};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> std::io::Result<()> {
        fs::write(dir.join(name), b"")
    }

    // Tests the manifest lists matched pairs by file name
    // Verified by writing full paths into the manifest
    #[test]
    fn test_pair_directory_writes_manifest() -> std::io::Result<()> {
        let dir = TempDir::new()?;
        touch(dir.path(), "C1_a.tif")?;
        touch(dir.path(), "C1_a_rois.zip")?;
        touch(dir.path(), "b.png")?;
        touch(dir.path(), "a_mask.tif")?;
        let out = dir.path().join("out");

        let correspondence = pair_directory(dir.path(), &out).expect("Failed to pair directory");
        assert_eq!(correspondence.groups.len(), 1);
        assert_eq!(correspondence.unmatched_primary.len(), 1);

        let manifest =
            DelimitedTable::read(&out.join("pairs.csv")).expect("Failed to read manifest");
        assert_eq!(manifest.headers(), ["sample_key", "image", "roi_archive"]);
        assert_eq!(manifest.rows(), [vec!["a", "C1_a.tif", "C1_a_rois.zip"]]);
        Ok(())
    }

    // Tests pairing fails when nothing matches
    // Verified by writing an empty manifest
    #[test]
    fn test_pair_directory_without_pairs() -> std::io::Result<()> {
        let dir = TempDir::new()?;
        touch(dir.path(), "a.tif")?;
        touch(dir.path(), "b_rois.zip")?;

        assert!(matches!(
            pair_directory(dir.path(), dir.path()),
            Err(PipelineError::InputMissing { .. })
        ));
        assert!(!dir.path().join("pairs.csv").exists());
        Ok(())
    }

    // Tests nucleus loading is fatal on empty or malformed input
    // Verified by skipping malformed nucleus tables
    #[test]
    fn test_load_nucleus_summaries() -> std::io::Result<()> {
        let dir = TempDir::new()?;
        assert!(matches!(
            load_nucleus_summaries(dir.path()),
            Err(PipelineError::InputMissing { .. })
        ));

        fs::write(dir.path().join("a.csv"), " Area , Mean\n10,1\n20,NA\n")?;
        let nuclei = load_nucleus_summaries(dir.path()).expect("Failed to load nuclei");
        assert_eq!(nuclei.len(), 2);
        assert!(nuclei.iter().all(|n| n.sample_key.as_str() == "a"));
        assert_eq!(
            nuclei.iter().map(|n| n.nucleus_mean_intensity).collect::<Vec<_>>(),
            [Some(1.0), None]
        );

        fs::write(dir.path().join("b.csv"), "Area,Median\n1,2\n")?;
        assert!(matches!(
            load_nucleus_summaries(dir.path()),
            Err(PipelineError::SchemaMismatch { .. })
        ));
        Ok(())
    }

    // Tests the raster-free mode writes every summary table
    // Verified by requiring derived pixel columns in raw tables
    #[test]
    fn test_aggregate_only() -> std::io::Result<()> {
        let dir = TempDir::new()?;
        let nuclei = dir.path().join("nuclei");
        let tables = dir.path().join("tables");
        fs::create_dir_all(&nuclei)?;
        fs::create_dir_all(&tables)?;
        fs::write(nuclei.join("C1_a.csv"), "Area,Mean\n10,1\n20,2\n30,3\n")?;
        fs::write(nuclei.join("C1_b.csv"), "Area,Mean\n40,4\n")?;
        fs::write(
            tables.join("a_0001-0002.csv"),
            "intensity [photon],sigma [nm]\n10,100\n30,50\n",
        )?;
        fs::write(tables.join("b_0003-0004.csv"), "intensity [photon]\n5\n")?;

        let output = dir.path().join("out");
        let mut runner = PipelineRunner::new(PipelineConfig::with_output_dir(output.clone()), false);
        let summary = runner
            .aggregate_only(&nuclei, &tables)
            .expect("Failed to aggregate");

        assert_eq!(
            summary,
            RunSummary {
                processed: 2,
                failed: 0,
                unmatched: 0,
                merged_rows: 4,
                correlations: 10,
            }
        );
        for name in [
            "foci_summary.csv",
            "results.csv",
            "spearman_pairs.csv",
            "run_report.csv",
        ] {
            assert!(output.join(name).is_file(), "{name} missing");
        }

        let foci = DelimitedTable::read(&output.join("foci_summary.csv"))
            .expect("Failed to read foci summary");
        assert_eq!(
            foci.text_column("mean_intensity_photons"),
            Some(vec!["20", "5"])
        );
        assert_eq!(foci.text_column("outlier_count"), Some(vec!["", ""]));
        Ok(())
    }

    // Tests a run refuses an invalid configuration before touching inputs
    // Verified by validating only inside the sample loop
    #[test]
    fn test_run_validates_config() -> std::io::Result<()> {
        let dir = TempDir::new()?;
        let mut config = PipelineConfig::with_output_dir(dir.path().to_path_buf());
        config.outlier_column = " ".to_string();

        let mut runner = PipelineRunner::new(config, false);
        assert!(matches!(
            runner.aggregate_only(&dir.path().join("missing"), dir.path()),
            Err(PipelineError::InvalidParameter { .. })
        ));
        assert!(!dir.path().join("run_report.csv").exists());
        Ok(())
    }
}
