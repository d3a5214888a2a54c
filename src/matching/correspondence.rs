//! Key-based pairing of primary files (images) with companions (ROI archives or tables)

use crate::io::error::{Result, input_missing};
use crate::matching::key::SampleKey;
use bitvec::prelude::{BitVec, bitvec};
use log::{info, warn};
use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};

/// One primary file and the companion matched to it by sample key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileGroup {
    /// Key shared by both files
    pub key: SampleKey,
    /// Image path
    pub primary: PathBuf,
    /// ROI archive or localization table path
    pub companion: PathBuf,
}

/// Result of matching two file sets, built once per run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Correspondence {
    /// Matched groups in sorted primary order
    pub groups: Vec<FileGroup>,
    /// Primary files with no remaining companion
    pub unmatched_primary: Vec<PathBuf>,
    /// Companions never claimed by a primary file
    pub unmatched_companion: Vec<PathBuf>,
}

impl Correspondence {
    /// Match `primary` files against `companions` by normalized key
    ///
    /// Both sets are sorted first. Each key holds a FIFO queue of companions;
    /// every primary file pops at most one, so duplicates pair up in listing
    /// order and the surplus is reported instead of being matched twice.
    pub fn build(primary: &[PathBuf], companions: &[PathBuf]) -> Self {
        let mut primary_sorted = primary.to_vec();
        primary_sorted.sort();
        let mut companions_sorted = companions.to_vec();
        companions_sorted.sort();

        let mut queues: BTreeMap<SampleKey, VecDeque<usize>> = BTreeMap::new();
        for (index, path) in companions_sorted.iter().enumerate() {
            queues
                .entry(SampleKey::from_path(path))
                .or_default()
                .push_back(index);
        }

        let mut claimed: BitVec = bitvec![0; companions_sorted.len()];
        let mut result = Self::default();

        for path in primary_sorted {
            let key = SampleKey::from_path(&path);
            let next = queues.get_mut(&key).and_then(VecDeque::pop_front);
            match next.and_then(|index| companions_sorted.get(index).map(|c| (index, c))) {
                Some((index, companion)) => {
                    claimed.set(index, true);
                    result.groups.push(FileGroup {
                        key,
                        primary: path,
                        companion: companion.clone(),
                    });
                }
                None => result.unmatched_primary.push(path),
            }
        }

        result.unmatched_companion = companions_sorted
            .into_iter()
            .zip(claimed.iter().by_vals())
            .filter_map(|(path, used)| (!used).then_some(path))
            .collect();

        result
    }

    /// Fail when nothing matched at all
    ///
    /// # Errors
    ///
    /// Returns [`crate::PipelineError::InputMissing`] naming `dir` if there are no groups
    pub fn require_groups(&self, dir: &Path) -> Result<()> {
        if self.groups.is_empty() {
            Err(input_missing(dir, &"no matching file pairs found"))
        } else {
            Ok(())
        }
    }

    /// Log pair and leftover counts, and every leftover file
    pub fn log_summary(&self, primary_label: &str, companion_label: &str) {
        info!(
            "Matched {} {primary_label}-{companion_label} pairs",
            self.groups.len()
        );
        if !self.unmatched_primary.is_empty() {
            warn!(
                "{} {primary_label} file(s) without {companion_label}",
                self.unmatched_primary.len()
            );
            for path in &self.unmatched_primary {
                warn!("  unmatched {primary_label}: {}", path.display());
            }
        }
        if !self.unmatched_companion.is_empty() {
            warn!(
                "{} {companion_label} file(s) without {primary_label}",
                self.unmatched_companion.len()
            );
            for path in &self.unmatched_companion {
                warn!("  unmatched {companion_label}: {}", path.display());
            }
        }
    }
}
