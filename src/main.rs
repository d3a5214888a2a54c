//! CLI entry point for the foci quantification pipeline

use clap::Parser;
use fociquant::io::cli::{Cli, CommandProcessor};
use fociquant::io::logging::init_logging;
use log::error;

fn main() -> fociquant::Result<()> {
    let cli = Cli::parse();
    let _logger = init_logging(
        &cli.log_level,
        Some(cli.output_dir()),
        cli.should_show_progress(),
    )?;
    let processor = CommandProcessor::new(cli);
    processor
        .process()
        .inspect_err(|failure| error!("{failure}"))
}
