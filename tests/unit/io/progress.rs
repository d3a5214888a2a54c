//! Tests for batch progress bookkeeping

#[cfg(test)]
mod tests {
    use fociquant::io::progress::ProgressManager;

    // Tests a batch with successes and failures runs to completion
    // Verified by finishing the bar before the last sample
    #[test]
    fn test_progress_runs_batch() {
        let mut progress = ProgressManager::new();
        progress.initialize(3);

        progress.start_sample("a");
        progress.complete_sample(true);
        progress.start_sample("b");
        progress.complete_sample(false);
        progress.start_sample("c");
        progress.complete_sample(true);
        progress.finish();

        progress.initialize(0);
        progress.finish();
    }

    // Tests that an idle manager ignores updates
    // Verified by requiring initialization before use
    #[test]
    fn test_idle_progress_is_inert() {
        let mut progress = ProgressManager::default();
        progress.start_sample("a");
        progress.complete_sample(false);
        progress.finish();
    }
}
