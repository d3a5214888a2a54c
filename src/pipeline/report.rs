//! Explicit record of what happened to every sample in a run

use crate::analysis::summary::FociSummary;
use crate::io::error::PipelineError;
use crate::io::table::DelimitedTable;
use crate::matching::key::SampleKey;
use log::error;
use std::fmt;
use std::path::Path;

/// Final state of one sample or leftover file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleStatus {
    /// Processed and summarised
    Processed,
    /// Processing started but failed; the run continued
    Failed,
    /// No counterpart file; never processed
    Unmatched,
}

impl fmt::Display for SampleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Processed => "processed",
            Self::Failed => "failed",
            Self::Unmatched => "unmatched",
        })
    }
}

/// One line of the run report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleOutcome {
    /// Key of the sample
    pub sample_key: SampleKey,
    /// File name the outcome refers to
    pub source: String,
    /// What happened
    pub status: SampleStatus,
    /// Foci count, failure message or unmatched role
    pub detail: String,
}

impl SampleOutcome {
    /// Column order of the report table
    pub const HEADERS: [&'static str; 4] = ["sample_key", "source", "status", "detail"];

    fn to_record(&self) -> Vec<String> {
        vec![
            self.sample_key.to_string(),
            self.source.clone(),
            self.status.to_string(),
            self.detail.clone(),
        ]
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Outcomes in the order they were recorded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    outcomes: Vec<SampleOutcome>,
}

impl RunReport {
    /// Empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a processing result; failures are logged with sample identity
    pub fn record(
        &mut self,
        sample_key: &SampleKey,
        source: &Path,
        outcome: Result<&FociSummary, &PipelineError>,
    ) {
        let (status, detail) = match outcome {
            Ok(summary) => (
                SampleStatus::Processed,
                format!("{} foci", summary.foci_count),
            ),
            Err(failure) => {
                error!("Sample {sample_key} ({}) skipped: {failure}", source.display());
                (SampleStatus::Failed, failure.to_string())
            }
        };
        self.outcomes.push(SampleOutcome {
            sample_key: sample_key.clone(),
            source: file_name(source),
            status,
            detail,
        });
    }

    /// Record files that had no counterpart under the given role
    ///
    /// Leftovers are logged when the correspondence is built, not here.
    pub fn record_unmatched(&mut self, files: &[impl AsRef<Path>], role: &str) {
        for path in files {
            let path = path.as_ref();
            self.outcomes.push(SampleOutcome {
                sample_key: SampleKey::from_path(path),
                source: file_name(path),
                status: SampleStatus::Unmatched,
                detail: format!("{role} without counterpart"),
            });
        }
    }

    /// Number of outcomes with the given status
    pub fn count(&self, status: SampleStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    /// Report as a table in recording order
    pub fn to_table(&self) -> DelimitedTable {
        DelimitedTable::new(
            SampleOutcome::HEADERS
                .iter()
                .map(|h| (*h).to_string())
                .collect(),
            self.outcomes.iter().map(SampleOutcome::to_record).collect(),
        )
    }
}
