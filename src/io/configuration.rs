//! Pipeline constants, defaults and the validated run configuration

use crate::analysis::filter::FilterConfig;
use crate::io::error::{Result, invalid_parameter};
use crate::spatial::transform::Calibration;
use std::path::PathBuf;

// Localization table columns as exported by the localization software
/// Default x-coordinate column (nanometres)
pub const DEFAULT_X_COLUMN: &str = "x [nm]";
/// Default y-coordinate column (nanometres)
pub const DEFAULT_Y_COLUMN: &str = "y [nm]";
/// Default fitted-width column (nanometres)
pub const DEFAULT_SIGMA_COLUMN: &str = "sigma [nm]";
/// Default per-localization intensity column
pub const DEFAULT_INTENSITY_COLUMN: &str = "intensity [photon]";

// Pre-filter and outlier classification
/// Sigma floor below which detections are treated as artifacts
pub const DEFAULT_FILTER_FLOOR: f64 = 75.0;
/// Column whose upper tail is flagged as outliers
pub const DEFAULT_OUTLIER_COLUMN: &str = MEAN_INTENSITY_COLUMN;
/// Multiplier applied to the interquartile range for the outlier bound
pub const IQR_MULTIPLIER: f64 = 1.5;

// Calibration of the localization coordinate space
/// Nanometres per pixel of the raster used during localization
pub const DEFAULT_LOCALIZATION_PIXEL_SIZE_NM: f64 = 16.0;
/// Raster size (width, height) used during localization
pub const DEFAULT_NOMINAL_SIZE: (u32, u32) = (2560, 2560);

/// Minimum pairwise-complete observations for a correlation
pub const MIN_CORRELATION_OBSERVATIONS: usize = 3;

// Derived columns appended to localization tables
/// Pixel x coordinate in the sampled raster
pub const X_PX_COLUMN: &str = "x_px";
/// Pixel y coordinate in the sampled raster
pub const Y_PX_COLUMN: &str = "y_px";
/// Disk radius in raster pixels
pub const SIGMA_PX_COLUMN: &str = "sigma_px";
/// Mean grayscale value under the disk
pub const MEAN_INTENSITY_COLUMN: &str = "mean_intensity";
/// Outlier flag written after filtering
pub const OUTLIER_COLUMN: &str = "Outlier";

// Nucleus measurement tables
/// Nucleus area column
pub const NUCLEUS_AREA_COLUMN: &str = "Area";
/// Nucleus mean fluorescence column
pub const NUCLEUS_MEAN_COLUMN: &str = "Mean";

// Directory listing rules
/// Raster file extensions accepted as images
pub const IMAGE_EXTENSIONS: [&str; 5] = ["tif", "tiff", "png", "jpg", "jpeg"];
/// Images containing this token are segmentation masks
pub const MASK_TOKEN: &str = "mask";
/// ROI archive extension
pub const ROI_ARCHIVE_EXTENSION: &str = "zip";
/// ROI archives must contain this token
pub const ROI_ARCHIVE_TOKEN: &str = "rois";
/// Delimited table extension
pub const TABLE_EXTENSION: &str = "csv";

// Output settings
/// Image to ROI archive pairing manifest
pub const PAIRS_FILE: &str = "pairs.csv";
/// Per-sample foci summaries
pub const FOCI_SUMMARY_FILE: &str = "foci_summary.csv";
/// Merged nucleus and foci table
pub const RESULTS_FILE: &str = "results.csv";
/// Pairwise Spearman correlations
pub const CORRELATION_FILE: &str = "spearman_pairs.csv";
/// Per-sample processing outcomes
pub const RUN_REPORT_FILE: &str = "run_report.csv";
/// Summary outputs never read back as inputs
pub const SUMMARY_FILE_NAMES: [&str; 5] = [
    PAIRS_FILE,
    FOCI_SUMMARY_FILE,
    RESULTS_FILE,
    CORRELATION_FILE,
    RUN_REPORT_FILE,
];
/// Suffix of localization tables augmented with pixel intensities
pub const INTENSITY_SUFFIX: &str = "_intensity";
/// Suffix of filtered and outlier-classified localization tables
pub const FILTERED_SUFFIX: &str = "_filtered";
/// Per-sample table suffixes never read back as inputs
pub const DERIVED_TABLE_SUFFIXES: [&str; 2] = [INTENSITY_SUFFIX, FILTERED_SUFFIX];
/// Base name of the log file written to the output directory
pub const LOG_BASENAME: &str = "fociquant";
/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Source-table column names for the localization fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizationColumns {
    /// x coordinate in nanometres
    pub x: String,
    /// y coordinate in nanometres
    pub y: String,
    /// Fitted width in nanometres
    pub sigma: String,
    /// Vendor intensity (e.g. photon count)
    pub intensity: String,
}

impl Default for LocalizationColumns {
    fn default() -> Self {
        Self {
            x: DEFAULT_X_COLUMN.to_string(),
            y: DEFAULT_Y_COLUMN.to_string(),
            sigma: DEFAULT_SIGMA_COLUMN.to_string(),
            intensity: DEFAULT_INTENSITY_COLUMN.to_string(),
        }
    }
}

impl LocalizationColumns {
    /// Columns every localization table must provide
    pub fn required(&self) -> [&str; 3] {
        [self.x.as_str(), self.y.as_str(), self.sigma.as_str()]
    }
}

/// Every option the core pipeline recognises
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Source-table column names
    pub columns: LocalizationColumns,
    /// Physical-plausibility pre-filter
    pub filter: FilterConfig,
    /// Discriminant column for the outlier rule
    pub outlier_column: String,
    /// Localization-to-raster calibration
    pub calibration: Calibration,
    /// Directory receiving every output table
    pub output_dir: PathBuf,
}

impl PipelineConfig {
    /// Configuration with every default and the given output directory
    pub fn with_output_dir(output_dir: PathBuf) -> Self {
        Self {
            columns: LocalizationColumns::default(),
            filter: FilterConfig::default(),
            outlier_column: DEFAULT_OUTLIER_COLUMN.to_string(),
            calibration: Calibration::default(),
            output_dir,
        }
    }

    /// Validate once at the boundary before any sample is processed
    ///
    /// # Errors
    ///
    /// Returns [`crate::PipelineError::InvalidParameter`] for empty column
    /// names, a non-finite filter floor or an invalid calibration
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("x_column", &self.columns.x),
            ("y_column", &self.columns.y),
            ("sigma_column", &self.columns.sigma),
            ("intensity_column", &self.columns.intensity),
            ("filter_column", &self.filter.column),
            ("outlier_column", &self.outlier_column),
        ];
        for (parameter, name) in named {
            if name.trim().is_empty() {
                return Err(invalid_parameter(
                    parameter,
                    name,
                    &"column name must not be empty",
                ));
            }
        }

        if !self.filter.floor.is_finite() {
            return Err(invalid_parameter(
                "filter_floor",
                &self.filter.floor,
                &"must be a finite number",
            ));
        }

        self.calibration.validate()
    }
}
