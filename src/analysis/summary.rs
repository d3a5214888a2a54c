//! Per-sample foci summaries derived from (filtered) localization tables

use crate::io::configuration::MEAN_INTENSITY_COLUMN;
use crate::io::table::{DelimitedTable, format_count, format_numeric};
use crate::math::descriptive::mean_present;
use crate::matching::key::SampleKey;
use bitvec::slice::BitSlice;

/// Aggregate description of the detections of one sample
#[derive(Debug, Clone, PartialEq)]
pub struct FociSummary {
    /// Sample the detections belong to
    pub sample_key: SampleKey,
    /// Detections that passed filtering
    pub foci_count: usize,
    /// Mean vendor intensity (photons)
    pub mean_intensity_photons: Option<f64>,
    /// Mean raster intensity under the detection disks
    pub mean_intensity_px: Option<f64>,
    /// Mean fitted width in nanometres
    pub mean_sigma_nm: Option<f64>,
    /// Detections flagged as outliers; `None` when no classification ran
    pub outlier_count: Option<usize>,
    /// Mean raster intensity of the outliers
    pub outlier_mean_intensity_px: Option<f64>,
    /// Mean fitted width of the outliers
    pub outlier_mean_sigma_nm: Option<f64>,
}

/// Column names a summary reads from a localization table
#[derive(Debug, Clone, Copy)]
pub struct SummaryColumns<'a> {
    /// Vendor intensity column
    pub intensity: &'a str,
    /// Fitted width column (nanometres)
    pub sigma: &'a str,
}

fn masked(values: &[Option<f64>], mask: &BitSlice) -> Vec<Option<f64>> {
    values
        .iter()
        .zip(mask.iter().by_vals())
        .filter_map(|(value, keep)| keep.then_some(*value))
        .collect()
}

impl FociSummary {
    /// Column order of the summary table
    pub const HEADERS: [&'static str; 8] = [
        "sample_key",
        "foci_count",
        "mean_intensity_photons",
        "mean_intensity_px",
        "mean_sigma_nm",
        "outlier_count",
        "outlier_mean_intensity_px",
        "outlier_mean_sigma_nm",
    ];

    /// Summarise `table`; absent columns yield `None` fields
    ///
    /// `outliers` is the classification mask aligned with the table rows. Without
    /// it the outlier fields stay `None` (as opposed to an explicit zero count).
    pub fn from_table(
        sample_key: SampleKey,
        table: &DelimitedTable,
        columns: SummaryColumns<'_>,
        outliers: Option<&BitSlice>,
    ) -> Self {
        let intensity = table.numeric_column(columns.intensity).unwrap_or_default();
        let sigma = table.numeric_column(columns.sigma).unwrap_or_default();
        let pixel_intensity = table
            .numeric_column(MEAN_INTENSITY_COLUMN)
            .unwrap_or_default();

        let (outlier_count, outlier_mean_intensity_px, outlier_mean_sigma_nm) =
            outliers.map_or((None, None, None), |mask| {
                (
                    Some(mask.count_ones()),
                    mean_present(&masked(&pixel_intensity, mask)),
                    mean_present(&masked(&sigma, mask)),
                )
            });

        Self {
            sample_key,
            foci_count: table.len(),
            mean_intensity_photons: mean_present(&intensity),
            mean_intensity_px: mean_present(&pixel_intensity),
            mean_sigma_nm: mean_present(&sigma),
            outlier_count,
            outlier_mean_intensity_px,
            outlier_mean_sigma_nm,
        }
    }

    /// Numeric fields in [`Self::HEADERS`] order, key excluded
    pub fn numeric_values(&self) -> [Option<f64>; 7] {
        [
            Some(self.foci_count as f64),
            self.mean_intensity_photons,
            self.mean_intensity_px,
            self.mean_sigma_nm,
            self.outlier_count.map(|c| c as f64),
            self.outlier_mean_intensity_px,
            self.outlier_mean_sigma_nm,
        ]
    }

    /// Cell texts in [`Self::HEADERS`] order
    pub fn to_record(&self) -> Vec<String> {
        vec![
            self.sample_key.to_string(),
            self.foci_count.to_string(),
            format_numeric(self.mean_intensity_photons),
            format_numeric(self.mean_intensity_px),
            format_numeric(self.mean_sigma_nm),
            format_count(self.outlier_count),
            format_numeric(self.outlier_mean_intensity_px),
            format_numeric(self.outlier_mean_sigma_nm),
        ]
    }

    /// Table of summaries in the given order
    pub fn to_table(summaries: &[Self]) -> DelimitedTable {
        DelimitedTable::new(
            Self::HEADERS.iter().map(|h| (*h).to_string()).collect(),
            summaries.iter().map(Self::to_record).collect(),
        )
    }
}
