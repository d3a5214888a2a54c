//! Tests for key-based pairing of primary and companion files

#[cfg(test)]
mod tests {
    use fociquant::PipelineError;
    use fociquant::matching::correspondence::Correspondence;
    use std::path::{Path, PathBuf};

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    // Tests FIFO consumption of duplicate companions for one key
    // Verified by letting every primary file claim all companions of its key
    #[test]
    fn test_build_duplicate_key_pops_first_companion() {
        let images = paths(&["images/A.tif", "images/B.tif"]);
        let tables = paths(&["tables_2/A.csv", "tables_1/A.csv"]);

        let result = Correspondence::build(&images, &tables);

        assert_eq!(result.groups.len(), 1);
        let group = result.groups.first();
        assert_eq!(
            group.map(|g| g.primary.as_path()),
            Some(Path::new("images/A.tif"))
        );
        assert_eq!(
            group.map(|g| g.companion.as_path()),
            Some(Path::new("tables_1/A.csv"))
        );
        assert_eq!(result.unmatched_primary, paths(&["images/B.tif"]));
        assert_eq!(result.unmatched_companion, paths(&["tables_2/A.csv"]));
    }

    // Tests that decorated names pair up and order follows sorted primaries
    // Verified by matching on raw file stems
    #[test]
    fn test_build_pairs_decorated_names_in_sorted_order() {
        let images = paths(&["C1_beta.tif", "C1_alpha.tif"]);
        let archives = paths(&["alpha_rois.zip", "beta_rois.zip", "gamma_rois.zip"]);

        let result = Correspondence::build(&images, &archives);

        let keys: Vec<&str> = result.groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["alpha", "beta"]);
        assert!(result.unmatched_primary.is_empty());
        assert_eq!(result.unmatched_companion, paths(&["gamma_rois.zip"]));
    }

    // Tests that two duplicates on each side pair off one to one
    // Verified by resetting the queue per primary file
    #[test]
    fn test_build_duplicates_on_both_sides() {
        let images = paths(&["a/s.tif", "b/s.tif"]);
        let tables = paths(&["x/s.csv", "y/s.csv"]);

        let result = Correspondence::build(&images, &tables);

        let pairs: Vec<(&Path, &Path)> = result
            .groups
            .iter()
            .map(|g| (g.primary.as_path(), g.companion.as_path()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (Path::new("a/s.tif"), Path::new("x/s.csv")),
                (Path::new("b/s.tif"), Path::new("y/s.csv")),
            ]
        );
        assert!(result.unmatched_companion.is_empty());
    }

    // Tests that an empty match set is a hard error
    // Verified by accepting empty correspondences
    #[test]
    fn test_require_groups_rejects_empty_match() {
        let result = Correspondence::build(&paths(&["a.tif"]), &paths(&["b.csv"]));
        assert!(matches!(
            result.require_groups(Path::new("images")),
            Err(PipelineError::InputMissing { .. })
        ));

        let matched = Correspondence::build(&paths(&["a.tif"]), &paths(&["a.csv"]));
        assert!(matched.require_groups(Path::new("images")).is_ok());
    }
}
