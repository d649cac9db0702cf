//! Spinner-backed import progress.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use sqlite_ingest_core::format_bytes_approx;
use sqlite_ingest_import::{ChunkReport, ImportProgress, ImportStats};

/// Shows the current phase and the latest committed chunk on one line.
///
/// Chunk details also go to the `debug` log so `--verbose` keeps a record
/// after the spinner clears.
pub(crate) struct SpinnerProgress {
    pb: ProgressBar,
}

impl SpinnerProgress {
    /// When `quiet` is true the spinner is hidden.
    pub(crate) fn new(quiet: bool) -> Self {
        let pb = ProgressBar::new_spinner();
        if quiet {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }
        pb.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} {msg}")
                .expect("static pattern")
                .tick_chars("/-\\|"),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb }
    }

    pub(crate) fn finish(&self) {
        self.pb.disable_steady_tick();
        self.pb.finish_and_clear();
    }
}

impl ImportProgress for SpinnerProgress {
    fn on_phase(&self, message: &str) {
        self.pb.set_message(message.to_string());
    }

    fn on_chunk(&self, report: &ChunkReport) {
        let msg = format!(
            "{} records ({:.0}/s), {} at {}",
            report.records_processed,
            report.rate(),
            format_bytes_approx(report.store_size_bytes),
            report.location,
        );
        log::debug!(
            "Committed {} record(s) in {:.2}s",
            report.chunk_records,
            report.chunk_elapsed.as_secs_f64()
        );
        self.pb.set_message(msg);
    }

    fn on_complete(&self, _stats: &ImportStats) {
        self.finish();
    }
}

impl Drop for SpinnerProgress {
    fn drop(&mut self) {
        if !self.pb.is_finished() {
            self.pb.finish_and_clear();
        }
    }
}
