//! Per-sample progress display for batch runs

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Samples: [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Single progress bar advanced once per processed sample
#[derive(Default)]
pub struct ProgressManager {
    bar: Option<ProgressBar>,
    failed: usize,
}

impl ProgressManager {
    /// Create an idle progress manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a bar sized for `sample_count` samples
    pub fn initialize(&mut self, sample_count: usize) {
        let bar = ProgressBar::new(sample_count as u64);
        bar.set_style(BATCH_STYLE.clone());
        self.bar = Some(bar);
        self.failed = 0;
    }

    /// Label the bar with the sample being processed
    pub fn start_sample(&self, sample: &str) {
        if let Some(ref bar) = self.bar {
            bar.set_message(sample.to_string());
        }
    }

    /// Advance the bar, counting failures separately
    pub fn complete_sample(&mut self, succeeded: bool) {
        if !succeeded {
            self.failed += 1;
        }
        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
    }

    /// Close the bar with a final message
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            let message = if self.failed == 0 {
                "All samples processed".to_string()
            } else {
                format!("{} sample(s) failed", self.failed)
            };
            bar.finish_with_message(message);
        }
    }
}
