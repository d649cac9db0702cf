//! Import progress reporting.

use std::time::Duration;

use sqlite_ingest_core::format_bytes_approx;

use crate::ingest::ImportStats;

/// Snapshot taken each time a transaction set commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkReport {
    /// Records written so far, across all committed chunks.
    pub records_processed: u64,
    /// Records in the chunk that just committed.
    pub chunk_records: u64,
    pub chunk_elapsed: Duration,
    pub total_elapsed: Duration,
    /// Store size after the commit.
    pub store_size_bytes: u64,
    /// Where the store lives, for display.
    pub location: String,
}

impl ChunkReport {
    /// Records per second over the whole import so far.
    pub fn rate(&self) -> f64 {
        let secs = self.total_elapsed.as_secs_f64();
        if secs > 0.0 {
            self.records_processed as f64 / secs
        } else {
            0.0
        }
    }
}

/// Trait for receiving import progress updates.
pub trait ImportProgress {
    /// Called when a phase starts (e.g., "Creating table 'people'").
    fn on_phase(&self, message: &str);

    /// Called after each committed transaction set.
    fn on_chunk(&self, report: &ChunkReport);

    /// Called once the import has finished successfully.
    fn on_complete(&self, stats: &ImportStats);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl ImportProgress for SilentProgress {
    fn on_phase(&self, _message: &str) {}
    fn on_chunk(&self, _report: &ChunkReport) {}
    fn on_complete(&self, _stats: &ImportStats) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl ImportProgress for LogProgress {
    fn on_phase(&self, message: &str) {
        log::info!("{}", message);
    }

    fn on_chunk(&self, report: &ChunkReport) {
        log::info!(
            "  {} records ({} in {:.2}s, {:.0}/s), store {} at {}",
            report.records_processed,
            report.chunk_records,
            report.chunk_elapsed.as_secs_f64(),
            report.rate(),
            format_bytes_approx(report.store_size_bytes),
            report.location,
        );
    }

    fn on_complete(&self, stats: &ImportStats) {
        log::info!(
            "Imported {} record(s) into '{}' in {:.2}s ({} transaction(s))",
            stats.records_written,
            stats.table,
            stats.elapsed.as_secs_f64(),
            stats.transactions_committed,
        );
    }
}
