//! Logger setup: stderr always, plus a log file in the output directory

use crate::io::configuration::LOG_BASENAME;
use crate::io::error::{Result, invalid_parameter};
use flexi_logger::{Duplicate, FileSpec, Logger, LoggerHandle};
use log::LevelFilter;
use std::path::Path;
use std::str::FromStr;

/// Parse a user-supplied level name (`off`, `error`, `warn`, `info`, `debug`, `trace`)
///
/// # Errors
///
/// Returns [`crate::PipelineError::InvalidParameter`] for unknown level names
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    LevelFilter::from_str(level.trim())
        .map_err(|_parse_error| invalid_parameter("log_level", &level, &"unknown log level"))
}

/// Records echoed to stderr next to the log file
///
/// While a progress bar is drawn only warnings and errors are echoed; the
/// file still receives everything.
pub const fn stderr_duplicate(show_progress: bool) -> Duplicate {
    if show_progress {
        Duplicate::Warn
    } else {
        Duplicate::All
    }
}

/// Start the global logger
///
/// `RUST_LOG` overrides `level` when set. With `log_dir`, records are also
/// written to `<log_dir>/fociquant.log`; the returned handle must stay alive
/// for the whole run.
///
/// # Errors
///
/// Returns an error for an unknown level or if the logger cannot be started
pub fn init_logging(
    level: &str,
    log_dir: Option<&Path>,
    show_progress: bool,
) -> Result<LoggerHandle> {
    let filter = parse_level(level)?;
    let logger = Logger::try_with_env_or_str(filter.as_str().to_lowercase())?;

    let handle = match log_dir {
        Some(dir) => logger
            .log_to_file(
                FileSpec::default()
                    .directory(dir)
                    .basename(LOG_BASENAME)
                    .suppress_timestamp(),
            )
            .duplicate_to_stderr(stderr_duplicate(show_progress))
            .start()?,
        None => logger.log_to_stderr().start()?,
    };

    Ok(handle)
}
