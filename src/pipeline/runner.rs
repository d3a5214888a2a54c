//! Batch orchestration: pairing, per-sample processing and the summary tables
//!
//! Correspondence is computed once, up front. Each sample then runs to a
//! [`Result`] that lands in the [`RunReport`], so one bad sample never stops
//! the batch. Only missing inputs and malformed nucleus tables abort a run.

use crate::analysis::aggregate::{MergedRow, NucleusSummary, aggregate};
use crate::analysis::correlation::{CorrelationPair, correlate, merged_columns};
use crate::analysis::summary::FociSummary;
use crate::io::configuration::{
    CORRELATION_FILE, FOCI_SUMMARY_FILE, PAIRS_FILE, PipelineConfig, RESULTS_FILE,
    RUN_REPORT_FILE,
};
use crate::io::error::Result;
use crate::io::progress::ProgressManager;
use crate::io::table::DelimitedTable;
use crate::matching::correspondence::Correspondence;
use crate::matching::key::SampleKey;
use crate::matching::listing::{list_images, list_roi_archives, list_tables, require_nonempty};
use crate::pipeline::localizations::{process_sample, summarize_raw};
use crate::pipeline::report::{RunReport, SampleStatus};
use log::info;
use std::path::{Path, PathBuf};

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Match images with ROI archives in one directory and write the manifest
///
/// # Errors
///
/// Returns [`crate::PipelineError::InputMissing`] if `dir` holds no images or
/// nothing matched, or an error if the manifest cannot be written
pub fn pair_directory(dir: &Path, output_dir: &Path) -> Result<Correspondence> {
    let images = require_nonempty(list_images(dir)?, dir, "images")?;
    let archives = list_roi_archives(dir)?;

    let correspondence = Correspondence::build(&images, &archives);
    correspondence.log_summary("image", "ROI archive");
    correspondence.require_groups(dir)?;

    let rows = correspondence
        .groups
        .iter()
        .map(|g| {
            vec![
                g.key.to_string(),
                file_name(&g.primary),
                file_name(&g.companion),
            ]
        })
        .collect();
    let manifest = DelimitedTable::new(
        vec![
            "sample_key".to_string(),
            "image".to_string(),
            "roi_archive".to_string(),
        ],
        rows,
    );
    let path = output_dir.join(PAIRS_FILE);
    manifest.write(&path)?;
    info!("Wrote {}", path.display());

    Ok(correspondence)
}

/// Nucleus summaries from every table in `dir`, in listing order
///
/// # Errors
///
/// Fails the whole run if the directory is missing or empty, or if any table
/// lacks the nucleus columns
pub fn load_nucleus_summaries(dir: &Path) -> Result<Vec<NucleusSummary>> {
    let tables = require_nonempty(list_tables(dir)?, dir, "nucleus tables")?;

    let mut nuclei = Vec::new();
    for path in &tables {
        let table = DelimitedTable::read(path)?;
        nuclei.extend(NucleusSummary::from_table(
            &SampleKey::from_path(path),
            &table,
            path,
        )?);
    }
    info!(
        "Loaded {} nucleus row(s) from {} table(s)",
        nuclei.len(),
        tables.len()
    );
    Ok(nuclei)
}

/// Input directories of a full run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunInputs {
    /// Raster images
    pub images: PathBuf,
    /// Per-sample localization tables
    pub tables: PathBuf,
    /// Per-sample nucleus measurement tables
    pub nuclei: PathBuf,
}

/// Counts describing a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Samples summarised successfully
    pub processed: usize,
    /// Samples that failed and were skipped
    pub failed: usize,
    /// Files left without a counterpart
    pub unmatched: usize,
    /// Rows in the merged table
    pub merged_rows: usize,
    /// Column pairs with a correlation
    pub correlations: usize,
}

impl RunSummary {
    /// Log the counts at info level
    pub fn log(&self) {
        info!(
            "Run finished: {} processed, {} failed, {} unmatched, {} merged row(s), {} correlation(s)",
            self.processed, self.failed, self.unmatched, self.merged_rows, self.correlations
        );
    }
}

/// Drives the pipeline over a batch of samples with optional progress display
pub struct PipelineRunner {
    config: PipelineConfig,
    progress: Option<ProgressManager>,
}

impl PipelineRunner {
    /// Create a runner; the configuration is validated when a run starts
    pub fn new(config: PipelineConfig, show_progress: bool) -> Self {
        Self {
            config,
            progress: show_progress.then(ProgressManager::new),
        }
    }

    /// Full run: match, process every sample, aggregate and correlate
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid configuration, missing inputs, a
    /// malformed nucleus table or unwritable summary outputs. Per-sample
    /// failures are recorded in the run report instead.
    pub fn run(&mut self, inputs: &RunInputs) -> Result<RunSummary> {
        self.config.validate()?;

        let images = require_nonempty(list_images(&inputs.images)?, &inputs.images, "images")?;
        let tables = require_nonempty(
            list_tables(&inputs.tables)?,
            &inputs.tables,
            "localization tables",
        )?;
        let nuclei = load_nucleus_summaries(&inputs.nuclei)?;

        let correspondence = Correspondence::build(&images, &tables);
        correspondence.log_summary("image", "table");
        correspondence.require_groups(&inputs.images)?;

        let mut report = RunReport::new();
        report.record_unmatched(&correspondence.unmatched_primary, "image");
        report.record_unmatched(&correspondence.unmatched_companion, "table");

        if let Some(ref mut pm) = self.progress {
            pm.initialize(correspondence.groups.len());
        }

        let mut foci = Vec::with_capacity(correspondence.groups.len());
        for group in &correspondence.groups {
            if let Some(ref pm) = self.progress {
                pm.start_sample(group.key.as_str());
            }

            let outcome = process_sample(group, &self.config).and_then(|sample| {
                sample.write(&self.config.output_dir, &group.companion)?;
                Ok(sample.summary)
            });
            report.record(&group.key, &group.companion, outcome.as_ref());

            if let Some(ref mut pm) = self.progress {
                pm.complete_sample(outcome.is_ok());
            }
            if let Ok(summary) = outcome {
                foci.push(summary);
            }
        }

        if let Some(ref pm) = self.progress {
            pm.finish();
        }

        self.finish(&nuclei, &foci, &report)
    }

    /// Raster-free run: summarise raw localization tables and aggregate
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid configuration, missing inputs, a
    /// malformed nucleus table or unwritable outputs
    pub fn aggregate_only(&mut self, nuclei_dir: &Path, tables_dir: &Path) -> Result<RunSummary> {
        self.config.validate()?;

        let nuclei = load_nucleus_summaries(nuclei_dir)?;
        let tables = require_nonempty(list_tables(tables_dir)?, tables_dir, "foci tables")?;

        if let Some(ref mut pm) = self.progress {
            pm.initialize(tables.len());
        }

        let mut report = RunReport::new();
        let mut foci = Vec::with_capacity(tables.len());
        for path in &tables {
            let key = SampleKey::from_path(path);
            if let Some(ref pm) = self.progress {
                pm.start_sample(key.as_str());
            }

            let outcome = DelimitedTable::read(path)
                .map(|table| summarize_raw(key.clone(), &table, &self.config.columns));
            report.record(&key, path, outcome.as_ref());

            if let Some(ref mut pm) = self.progress {
                pm.complete_sample(outcome.is_ok());
            }
            if let Ok(summary) = outcome {
                foci.push(summary);
            }
        }

        if let Some(ref pm) = self.progress {
            pm.finish();
        }

        self.finish(&nuclei, &foci, &report)
    }

    fn finish(
        &self,
        nuclei: &[NucleusSummary],
        foci: &[FociSummary],
        report: &RunReport,
    ) -> Result<RunSummary> {
        let output_dir = &self.config.output_dir;
        let merged = aggregate(nuclei, foci);
        let correlations = correlate(&merged_columns(&merged));

        write_output(output_dir, FOCI_SUMMARY_FILE, &FociSummary::to_table(foci))?;
        write_output(output_dir, RESULTS_FILE, &MergedRow::to_table(&merged))?;
        write_output(
            output_dir,
            CORRELATION_FILE,
            &CorrelationPair::to_table(&correlations),
        )?;
        write_output(output_dir, RUN_REPORT_FILE, &report.to_table())?;

        let summary = RunSummary {
            processed: report.count(SampleStatus::Processed),
            failed: report.count(SampleStatus::Failed),
            unmatched: report.count(SampleStatus::Unmatched),
            merged_rows: merged.len(),
            correlations: correlations.len(),
        };
        summary.log();
        Ok(summary)
    }
}

fn write_output(output_dir: &Path, name: &str, table: &DelimitedTable) -> Result<()> {
    let path = output_dir.join(name);
    table.write(&path)?;
    info!("Wrote {} ({} row(s))", path.display(), table.len());
    Ok(())
}
