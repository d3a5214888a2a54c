//! Error types and path context for pipeline operations

use std::fmt;
use std::path::{Path, PathBuf};

/// Main error type for all pipeline operations
#[derive(Debug)]
pub enum PipelineError {
    /// A required directory or file set is absent or empty
    InputMissing {
        /// Offending directory or file
        path: PathBuf,
        /// What was expected to be there
        reason: String,
    },

    /// A loaded table lacks a column the pipeline needs
    SchemaMismatch {
        /// Table file that was inspected
        path: PathBuf,
        /// Name of the missing column
        column: String,
        /// Columns that were actually present (trimmed)
        available: Vec<String>,
    },

    /// Failed to decode a raster from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image decoding error
        source: image::ImageError,
    },

    /// Failed to read or write a delimited table
    Table {
        /// Path to the table file
        path: PathBuf,
        /// Underlying CSV error
        source: csv::Error,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Configuration value failed validation
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Logger could not be started
    Logging {
        /// Underlying logger error
        source: flexi_logger::FlexiLoggerError,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputMissing { path, reason } => {
                write!(f, "Missing input '{}': {reason}", path.display())
            }
            Self::SchemaMismatch {
                path,
                column,
                available,
            } => {
                write!(
                    f,
                    "Table '{}' has no column '{column}' (found: {})",
                    path.display(),
                    available.join(", ")
                )
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::Table { path, source } => {
                write!(f, "Table error in '{}': {source}", path.display())
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::Logging { source } => write!(f, "Failed to start logger: {source}"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } => Some(source),
            Self::Table { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::Logging { source } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for pipeline results
pub type Result<T> = std::result::Result<T, PipelineError>;

impl From<flexi_logger::FlexiLoggerError> for PipelineError {
    fn from(source: flexi_logger::FlexiLoggerError) -> Self {
        Self::Logging { source }
    }
}

/// Attaches the file being worked on to raw I/O and CSV failures
pub trait WithPath<T> {
    /// Wrap the error together with the path and operation that produced it
    ///
    /// # Errors
    ///
    /// Propagates the original error converted into a [`PipelineError`]
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T>;
}

impl<T> WithPath<T> for std::result::Result<T, std::io::Error> {
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T> {
        self.map_err(|source| PipelineError::FileSystem {
            path: path.to_path_buf(),
            operation,
            source,
        })
    }
}

impl<T> WithPath<T> for std::result::Result<T, csv::Error> {
    fn with_path(self, path: &Path, _operation: &'static str) -> Result<T> {
        self.map_err(|source| PipelineError::Table {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> PipelineError {
    PipelineError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an input-missing error for a path
pub fn input_missing(path: &Path, reason: &impl ToString) -> PipelineError {
    PipelineError::InputMissing {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
