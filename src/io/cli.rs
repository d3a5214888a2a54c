//! Command-line interface: pairing, full runs and raster-free aggregation

use crate::analysis::filter::FilterConfig;
use crate::io::configuration::{
    DEFAULT_FILTER_FLOOR, DEFAULT_INTENSITY_COLUMN, DEFAULT_LOCALIZATION_PIXEL_SIZE_NM,
    DEFAULT_LOG_LEVEL, DEFAULT_NOMINAL_SIZE, DEFAULT_OUTLIER_COLUMN, DEFAULT_SIGMA_COLUMN,
    DEFAULT_X_COLUMN, DEFAULT_Y_COLUMN, LocalizationColumns, PipelineConfig,
};
use crate::io::error::{Result, invalid_parameter};
use crate::pipeline::runner::{PipelineRunner, RunInputs, pair_directory};
use crate::spatial::transform::Calibration;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fociquant")]
#[command(
    author,
    version,
    about = "Match microscopy artifacts, sample foci intensities and aggregate per-nucleus statistics"
)]
/// Command-line arguments for the foci quantification pipeline
pub struct Cli {
    /// Operation to perform
    #[command(subcommand)]
    pub command: Command,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log level (off, error, warn, info, debug, trace); `RUST_LOG` overrides it
    #[arg(long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,
}

/// Pipeline operations
#[derive(Subcommand)]
pub enum Command {
    /// Pair images with ROI archives in one directory and write a manifest
    Pair {
        /// Directory holding images and ROI archives
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Directory for the manifest (defaults to DIR)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Process every image and localization table pair, then aggregate
    Run(RunArgs),
    /// Summarise raw localization tables and aggregate without rasters
    Aggregate(AggregateArgs),
}

/// Arguments of a full run
#[derive(Args)]
pub struct RunArgs {
    /// Directory of raster images
    #[arg(long)]
    pub images: PathBuf,

    /// Directory of localization tables
    #[arg(long)]
    pub tables: PathBuf,

    /// Directory of nucleus measurement tables
    #[arg(long)]
    pub nuclei: PathBuf,

    /// Directory receiving every output
    #[arg(short, long)]
    pub output: PathBuf,

    #[command(flatten)]
    #[allow(missing_docs)]
    pub columns: ColumnArgs,

    #[command(flatten)]
    #[allow(missing_docs)]
    pub calibration: CalibrationArgs,
}

impl RunArgs {
    /// Input directories of the run
    pub fn inputs(&self) -> RunInputs {
        RunInputs {
            images: self.images.clone(),
            tables: self.tables.clone(),
            nuclei: self.nuclei.clone(),
        }
    }

    /// Validated configuration for the run
    ///
    /// # Errors
    ///
    /// Returns [`crate::PipelineError::InvalidParameter`] for inconsistent
    /// calibration flags or invalid values
    pub fn to_config(&self) -> Result<PipelineConfig> {
        self.columns
            .to_config(self.calibration.to_calibration()?, self.output.clone())
    }
}

/// Arguments of a raster-free aggregation
#[derive(Args)]
pub struct AggregateArgs {
    /// Directory of nucleus measurement tables
    #[arg(long)]
    pub nuclei: PathBuf,

    /// Directory of localization tables
    #[arg(long)]
    pub tables: PathBuf,

    /// Directory receiving every output
    #[arg(short, long)]
    pub output: PathBuf,

    #[command(flatten)]
    #[allow(missing_docs)]
    pub columns: ColumnArgs,
}

impl AggregateArgs {
    /// Validated configuration; calibration is unused and left at its default
    ///
    /// # Errors
    ///
    /// Returns [`crate::PipelineError::InvalidParameter`] for invalid values
    pub fn to_config(&self) -> Result<PipelineConfig> {
        self.columns
            .to_config(Calibration::default(), self.output.clone())
    }
}

/// Source-table column names and filter settings
#[derive(Args)]
pub struct ColumnArgs {
    /// x coordinate column (nanometres)
    #[arg(long, default_value = DEFAULT_X_COLUMN)]
    pub x_column: String,

    /// y coordinate column (nanometres)
    #[arg(long, default_value = DEFAULT_Y_COLUMN)]
    pub y_column: String,

    /// Fitted width column (nanometres)
    #[arg(long, default_value = DEFAULT_SIGMA_COLUMN)]
    pub sigma_column: String,

    /// Vendor intensity column
    #[arg(long, default_value = DEFAULT_INTENSITY_COLUMN)]
    pub intensity_column: String,

    /// Pre-filter column (defaults to the sigma column)
    #[arg(long)]
    pub filter_column: Option<String>,

    /// Rows are kept when the filter column is strictly above this value
    #[arg(long, default_value_t = DEFAULT_FILTER_FLOOR, allow_negative_numbers = true)]
    pub filter_floor: f64,

    /// Column whose upper tail is flagged as outliers
    #[arg(long, default_value = DEFAULT_OUTLIER_COLUMN)]
    pub outlier_column: String,
}

impl ColumnArgs {
    fn to_config(&self, calibration: Calibration, output_dir: PathBuf) -> Result<PipelineConfig> {
        let config = PipelineConfig {
            columns: LocalizationColumns {
                x: self.x_column.clone(),
                y: self.y_column.clone(),
                sigma: self.sigma_column.clone(),
                intensity: self.intensity_column.clone(),
            },
            filter: FilterConfig {
                column: self
                    .filter_column
                    .clone()
                    .unwrap_or_else(|| self.sigma_column.clone()),
                floor: self.filter_floor,
            },
            outlier_column: self.outlier_column.clone(),
            calibration,
            output_dir,
        };
        config.validate()?;
        Ok(config)
    }
}

/// How localization coordinates are calibrated against the raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScaleModel {
    /// Current raster size over the nominal localization size
    Ratio,
    /// Explicit nanometres-per-pixel of both coordinate spaces
    Physical,
}

/// Calibration flags
#[derive(Args)]
pub struct CalibrationArgs {
    /// Calibration model
    #[arg(long, value_enum, default_value_t = ScaleModel::Ratio)]
    pub scale_model: ScaleModel,

    /// Localization pixel size in nm/px for both axes
    #[arg(long, default_value_t = DEFAULT_LOCALIZATION_PIXEL_SIZE_NM)]
    pub loc_pixel_size: f64,

    /// Localization pixel size along x (overrides --loc-pixel-size)
    #[arg(long)]
    pub loc_pixel_size_x: Option<f64>,

    /// Localization pixel size along y (physical model only)
    #[arg(long)]
    pub loc_pixel_size_y: Option<f64>,

    /// Raster width used during localization (ratio model)
    #[arg(long, default_value_t = DEFAULT_NOMINAL_SIZE.0)]
    pub nominal_width: u32,

    /// Raster height used during localization (ratio model)
    #[arg(long, default_value_t = DEFAULT_NOMINAL_SIZE.1)]
    pub nominal_height: u32,

    /// Target raster pixel size along x in nm/px (physical model)
    #[arg(long)]
    pub raster_pixel_size_x: Option<f64>,

    /// Target raster pixel size along y in nm/px (physical model)
    #[arg(long)]
    pub raster_pixel_size_y: Option<f64>,
}

impl CalibrationArgs {
    /// Build the calibration selected by `--scale-model`
    ///
    /// # Errors
    ///
    /// Returns [`crate::PipelineError::InvalidParameter`] if the physical model
    /// lacks a raster pixel size, or if the ratio model is given a per-axis y
    /// or raster pixel size it would ignore
    pub fn to_calibration(&self) -> Result<Calibration> {
        match self.scale_model {
            ScaleModel::Ratio => {
                let physical_only = [
                    ("loc_pixel_size_y", self.loc_pixel_size_y),
                    ("raster_pixel_size_x", self.raster_pixel_size_x),
                    ("raster_pixel_size_y", self.raster_pixel_size_y),
                ];
                if let Some((parameter, Some(value))) =
                    physical_only.into_iter().find(|(_, value)| value.is_some())
                {
                    return Err(invalid_parameter(
                        parameter,
                        &value,
                        &"only used by the physical scale model",
                    ));
                }
                Ok(Calibration::Ratio {
                    localization_px_nm: self.loc_pixel_size_x.unwrap_or(self.loc_pixel_size),
                    nominal_size: (self.nominal_width, self.nominal_height),
                })
            }
            ScaleModel::Physical => {
                let raster_x = self.raster_pixel_size_x.ok_or_else(|| {
                    invalid_parameter(
                        "raster_pixel_size_x",
                        &"unset",
                        &"required by the physical scale model",
                    )
                })?;
                let raster_y = self.raster_pixel_size_y.unwrap_or(raster_x);
                Ok(Calibration::Physical {
                    localization_px_nm: (
                        self.loc_pixel_size_x.unwrap_or(self.loc_pixel_size),
                        self.loc_pixel_size_y.unwrap_or(self.loc_pixel_size),
                    ),
                    raster_px_nm: (raster_x, raster_y),
                })
            }
        }
    }
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Directory receiving outputs and the log file
    pub fn output_dir(&self) -> &Path {
        match &self.command {
            Command::Pair { dir, output } => output.as_deref().unwrap_or(dir),
            Command::Run(args) => &args.output,
            Command::Aggregate(args) => &args.output,
        }
    }
}

/// Dispatches a parsed command line to the pipeline
pub struct CommandProcessor {
    cli: Cli,
}

impl CommandProcessor {
    /// Create a processor for the given arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the selected command
    ///
    /// # Errors
    ///
    /// Returns any fatal pipeline error; per-sample failures only show up in
    /// the run report
    pub fn process(&self) -> Result<()> {
        let show_progress = self.cli.should_show_progress();
        match &self.cli.command {
            Command::Pair { dir, .. } => {
                pair_directory(dir, self.cli.output_dir())?;
            }
            Command::Run(args) => {
                let mut runner = PipelineRunner::new(args.to_config()?, show_progress);
                runner.run(&args.inputs())?;
            }
            Command::Aggregate(args) => {
                let mut runner = PipelineRunner::new(args.to_config()?, show_progress);
                runner.aggregate_only(&args.nuclei, &args.tables)?;
            }
        }
        Ok(())
    }
}
