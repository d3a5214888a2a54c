//! Left join of nucleus measurements with foci summaries on the sample key

use crate::analysis::summary::FociSummary;
use crate::io::configuration::{NUCLEUS_AREA_COLUMN, NUCLEUS_MEAN_COLUMN};
use crate::io::error::Result;
use crate::io::table::{DelimitedTable, format_numeric};
use crate::matching::key::SampleKey;
use std::collections::BTreeMap;
use std::path::Path;

/// One segmented nucleus of a sample
#[derive(Debug, Clone, PartialEq)]
pub struct NucleusSummary {
    /// Sample the nucleus belongs to
    pub sample_key: SampleKey,
    /// Segmented area
    pub nucleus_area: Option<f64>,
    /// Mean fluorescence inside the nucleus
    pub nucleus_mean_intensity: Option<f64>,
}

impl NucleusSummary {
    /// One summary per row of a nucleus measurement table
    ///
    /// Non-numeric cells become `None`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PipelineError::SchemaMismatch`] if the `Area` or `Mean`
    /// column is missing
    pub fn from_table(
        sample_key: &SampleKey,
        table: &DelimitedTable,
        path: &Path,
    ) -> Result<Vec<Self>> {
        table.require_column(NUCLEUS_AREA_COLUMN, path)?;
        table.require_column(NUCLEUS_MEAN_COLUMN, path)?;

        let areas = table.numeric_column(NUCLEUS_AREA_COLUMN).unwrap_or_default();
        let means = table.numeric_column(NUCLEUS_MEAN_COLUMN).unwrap_or_default();

        Ok(areas
            .into_iter()
            .zip(means)
            .map(|(nucleus_area, nucleus_mean_intensity)| Self {
                sample_key: sample_key.clone(),
                nucleus_area,
                nucleus_mean_intensity,
            })
            .collect())
    }
}

/// A nucleus row widened with its sample's foci summary, if any
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    /// Nucleus measurements (always present)
    pub nucleus: NucleusSummary,
    /// Matching foci summary; `None` means no detections passed filtering
    pub foci: Option<FociSummary>,
}

impl MergedRow {
    /// Column order of the merged table
    pub const HEADERS: [&'static str; 10] = [
        "sample_key",
        "nucleus_area",
        "nucleus_mean_intensity",
        "foci_count",
        "mean_intensity_photons",
        "mean_intensity_px",
        "mean_sigma_nm",
        "outlier_count",
        "outlier_mean_intensity_px",
        "outlier_mean_sigma_nm",
    ];

    /// Numeric fields in [`Self::HEADERS`] order, key excluded
    pub fn numeric_values(&self) -> [Option<f64>; 9] {
        let foci = self
            .foci
            .as_ref()
            .map_or([None; 7], FociSummary::numeric_values);
        let [count, photons, px, sigma, outliers, outlier_px, outlier_sigma] = foci;
        [
            self.nucleus.nucleus_area,
            self.nucleus.nucleus_mean_intensity,
            count,
            photons,
            px,
            sigma,
            outliers,
            outlier_px,
            outlier_sigma,
        ]
    }

    /// Cell texts in [`Self::HEADERS`] order; missing foci fields are empty
    pub fn to_record(&self) -> Vec<String> {
        let mut record = vec![
            self.nucleus.sample_key.to_string(),
            format_numeric(self.nucleus.nucleus_area),
            format_numeric(self.nucleus.nucleus_mean_intensity),
        ];
        match &self.foci {
            Some(foci) => record.extend(foci.to_record().into_iter().skip(1)),
            None => record.extend(std::iter::repeat_n(String::new(), 7)),
        }
        record
    }

    /// Table of merged rows in the given order
    pub fn to_table(rows: &[Self]) -> DelimitedTable {
        DelimitedTable::new(
            Self::HEADERS.iter().map(|h| (*h).to_string()).collect(),
            rows.iter().map(Self::to_record).collect(),
        )
    }
}

/// Left join: every nucleus row survives, in input order
///
/// A nucleus row is repeated once per foci summary sharing its key (in foci
/// order); without a match it appears once with `foci: None`.
pub fn aggregate(nuclei: &[NucleusSummary], foci: &[FociSummary]) -> Vec<MergedRow> {
    let mut by_key: BTreeMap<&SampleKey, Vec<&FociSummary>> = BTreeMap::new();
    for summary in foci {
        by_key.entry(&summary.sample_key).or_default().push(summary);
    }

    let mut merged = Vec::with_capacity(nuclei.len());
    for nucleus in nuclei {
        match by_key.get(&nucleus.sample_key) {
            Some(matches) => {
                for summary in matches {
                    merged.push(MergedRow {
                        nucleus: nucleus.clone(),
                        foci: Some((*summary).clone()),
                    });
                }
            }
            None => merged.push(MergedRow {
                nucleus: nucleus.clone(),
                foci: None,
            }),
        }
    }
    merged
}
