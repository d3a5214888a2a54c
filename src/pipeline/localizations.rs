//! Per-sample processing of one localization table against its raster
//!
//! Every stage returns a new table; the source table on disk is never touched.

use crate::analysis::filter::FilterConfig;
use crate::analysis::outliers::{OutlierBounds, classify};
use crate::analysis::summary::{FociSummary, SummaryColumns};
use crate::io::configuration::{
    FILTERED_SUFFIX, INTENSITY_SUFFIX, LocalizationColumns, MEAN_INTENSITY_COLUMN, OUTLIER_COLUMN,
    PipelineConfig, SIGMA_PX_COLUMN, TABLE_EXTENSION, X_PX_COLUMN, Y_PX_COLUMN,
};
use crate::io::error::Result;
use crate::io::image::load_grayscale;
use crate::io::table::{DelimitedTable, format_numeric};
use crate::matching::correspondence::FileGroup;
use crate::matching::key::SampleKey;
use crate::spatial::sampling::IntensitySampler;
use crate::spatial::transform::{Localization, PixelMapping};
use bitvec::prelude::{BitSlice, BitVec};
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Localization rows of a table; `None` where x, y or sigma is not numeric
///
/// # Errors
///
/// Returns [`crate::PipelineError::SchemaMismatch`] if a coordinate or sigma
/// column is missing
pub fn read_localizations(
    table: &DelimitedTable,
    path: &Path,
    columns: &LocalizationColumns,
) -> Result<Vec<Option<Localization>>> {
    for name in columns.required() {
        table.require_column(name, path)?;
    }

    let xs = table.numeric_column(&columns.x).unwrap_or_default();
    let ys = table.numeric_column(&columns.y).unwrap_or_default();
    let sigmas = table.numeric_column(&columns.sigma).unwrap_or_default();

    Ok(xs
        .into_iter()
        .zip(ys)
        .zip(sigmas)
        .map(|((x, y), sigma)| {
            Some(Localization {
                x_nm: x?,
                y_nm: y?,
                sigma_nm: sigma?,
            })
        })
        .collect())
}

/// Table widened with pixel coordinates and sampled intensities
#[derive(Debug, Clone, PartialEq)]
pub struct Augmented {
    /// Source columns followed by the derived ones
    pub table: DelimitedTable,
    /// Set for rows with a parsed localization
    pub localized: BitVec,
    /// Rows without numeric coordinates
    pub unparsed: usize,
    /// Rows whose disk fell entirely outside the raster
    pub outside: usize,
}

/// Append `x_px`, `y_px`, `sigma_px` and `mean_intensity` to `table`
///
/// `localizations` must be aligned with the table rows. Rows without a
/// localization get empty derived cells.
pub fn augment(
    table: &DelimitedTable,
    localizations: &[Option<Localization>],
    mapping: &PixelMapping,
    sampler: &IntensitySampler<'_, f64>,
) -> Augmented {
    let mut x_px = Vec::with_capacity(localizations.len());
    let mut y_px = Vec::with_capacity(localizations.len());
    let mut sigma_px = Vec::with_capacity(localizations.len());
    let mut intensity = Vec::with_capacity(localizations.len());
    let mut unparsed = 0;
    let mut outside = 0;

    for localization in localizations {
        match localization {
            Some(localization) => {
                let position = mapping.to_pixel(localization);
                let mean = sampler.sample(position);
                if mean.is_none() {
                    outside += 1;
                }
                x_px.push(position.x.to_string());
                y_px.push(position.y.to_string());
                sigma_px.push(position.radius.to_string());
                intensity.push(format_numeric(mean));
            }
            None => {
                unparsed += 1;
                x_px.push(String::new());
                y_px.push(String::new());
                sigma_px.push(String::new());
                intensity.push(String::new());
            }
        }
    }

    let table = table.with_columns(vec![
        (X_PX_COLUMN.to_string(), x_px),
        (Y_PX_COLUMN.to_string(), y_px),
        (SIGMA_PX_COLUMN.to_string(), sigma_px),
        (MEAN_INTENSITY_COLUMN.to_string(), intensity),
    ]);

    Augmented {
        table,
        localized: localizations.iter().map(Option::is_some).collect(),
        unparsed,
        outside,
    }
}

/// Filtered table with its `Outlier` column and the mask behind it
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    /// Rows passing the pre-filter, `Outlier` appended
    pub table: DelimitedTable,
    /// Outlier flag per retained row
    pub outliers: BitVec,
    /// Bounds used, `None` when the discriminant had no values
    pub bounds: Option<OutlierBounds>,
}

/// Pre-filter `table`, then flag the upper tail of `outlier_column`
///
/// Only rows set in `localized` are eligible; the rest are dropped whatever
/// their filter value.
///
/// # Errors
///
/// Returns [`crate::PipelineError::SchemaMismatch`] if the filter or outlier
/// column is missing
pub fn filter_and_classify(
    table: &DelimitedTable,
    path: &Path,
    filter: &FilterConfig,
    outlier_column: &str,
    localized: &BitSlice,
) -> Result<Classified> {
    let filtered = filter.apply(&table.select_rows(localized), path)?;
    filtered.require_column(outlier_column, path)?;

    let values = filtered.numeric_column(outlier_column).unwrap_or_default();
    let (outliers, bounds) = classify(&values);
    let flags = outliers.iter().by_vals().map(|f| f.to_string()).collect();

    Ok(Classified {
        table: filtered.with_columns(vec![(OUTLIER_COLUMN.to_string(), flags)]),
        outliers,
        bounds,
    })
}

/// Every artifact derived from one sample
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedSample {
    /// Source table plus derived pixel columns
    pub augmented: Augmented,
    /// Filtered and outlier-classified rows
    pub classified: Classified,
    /// Per-sample summary
    pub summary: FociSummary,
}

/// Run the whole per-sample stage for one image and table pair
///
/// The table schema is checked before the raster is decoded.
///
/// # Errors
///
/// Returns an error if the table or raster cannot be read, a configured column
/// is missing, or the raster cannot be calibrated
pub fn process_sample(group: &FileGroup, config: &PipelineConfig) -> Result<ProcessedSample> {
    let source = &group.companion;
    let table = DelimitedTable::read(source)?;
    let localizations = read_localizations(&table, source, &config.columns)?;

    let raster = load_grayscale(&group.primary)?;
    let sampler = IntensitySampler::new(raster.view());
    let mapping = config.calibration.resolve(sampler.dimensions())?;

    let augmented = augment(&table, &localizations, &mapping, &sampler);
    if augmented.unparsed > 0 {
        warn!(
            "{}: {} row(s) without numeric coordinates",
            group.key, augmented.unparsed
        );
    }
    if augmented.outside > 0 {
        warn!(
            "{}: {} localization(s) outside the raster",
            group.key, augmented.outside
        );
    }

    let classified = filter_and_classify(
        &augmented.table,
        source,
        &config.filter,
        &config.outlier_column,
        &augmented.localized,
    )?;
    if let Some(bounds) = classified.bounds {
        debug!(
            "{}: Q1={} Q3={} upper bound={}",
            group.key, bounds.q1, bounds.q3, bounds.upper
        );
    }

    let summary = FociSummary::from_table(
        group.key.clone(),
        &classified.table,
        SummaryColumns {
            intensity: &config.columns.intensity,
            sigma: &config.columns.sigma,
        },
        Some(&classified.outliers),
    );

    Ok(ProcessedSample {
        augmented,
        classified,
        summary,
    })
}

impl ProcessedSample {
    /// Write the augmented and filtered tables next to each other in `output_dir`
    ///
    /// # Errors
    ///
    /// Returns an error if either table cannot be written
    pub fn write(&self, output_dir: &Path, source: &Path) -> Result<()> {
        self.augmented
            .table
            .write(&derived_table_path(output_dir, source, INTENSITY_SUFFIX))?;
        self.classified
            .table
            .write(&derived_table_path(output_dir, source, FILTERED_SUFFIX))
    }
}

/// Summary of a raw localization table: no raster, filter or classification
///
/// Pixel-intensity and outlier fields stay `None`.
pub fn summarize_raw(
    key: SampleKey,
    table: &DelimitedTable,
    columns: &LocalizationColumns,
) -> FociSummary {
    FociSummary::from_table(
        key,
        table,
        SummaryColumns {
            intensity: &columns.intensity,
            sigma: &columns.sigma,
        },
        None,
    )
}

/// `<output_dir>/<source stem><suffix>.csv`
pub fn derived_table_path(output_dir: &Path, source: &Path, suffix: &str) -> PathBuf {
    let stem = source.file_stem().unwrap_or_default().to_string_lossy();
    output_dir.join(format!("{stem}{suffix}.{TABLE_EXTENSION}"))
}
