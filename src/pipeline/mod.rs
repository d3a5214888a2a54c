//! End-to-end processing of a batch of samples
//!
//! - Per-sample stage: transform, sample, filter, classify, summarise
//! - Run report collecting one outcome per sample
//! - Batch runner writing the summary, merged and correlation tables

/// Per-sample processing of localization tables
pub mod localizations;
/// Per-sample outcomes of a run
pub mod report;
/// Batch orchestration and summary outputs
pub mod runner;

pub use report::{RunReport, SampleStatus};
pub use runner::{PipelineRunner, RunInputs, RunSummary};
