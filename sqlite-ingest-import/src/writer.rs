//! Batch writer: stream records into a table in committed chunks.
//!
//! One `INSERT` is prepared for the whole stream. Transactions are driven by
//! hand (`BEGIN`/`COMMIT`) so the prepared statement survives each chunk
//! boundary.

use std::time::{Duration, Instant};

use rusqlite::params_from_iter;
use sqlite_ingest_core::{Record, Value, quote_ident};
use sqlite_ingest_db::{Database, PerformanceMode};

use crate::coerce::coerce_value;
use crate::error::ImportError;
use crate::progress::{ChunkReport, ImportProgress};
use crate::reconcile::InsertColumn;

/// How a write is chunked and tuned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Records per committed transaction; 0 writes everything in one.
    pub transaction_set: usize,
    /// Applied for the duration of the write, then restored.
    pub performance: PerformanceMode,
}

/// What a completed write did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteStats {
    pub records_written: u64,
    pub transactions_committed: u64,
    pub chunks: Vec<ChunkReport>,
    pub elapsed: Duration,
}

/// Build `INSERT INTO "t" ("a", "b") VALUES (?1, ?2)` for `columns`.
pub fn insert_sql(table: &str, columns: &[InsertColumn]) -> String {
    let names: Vec<String> = columns.iter().map(|c| quote_ident(&c.column)).collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        names.join(", "),
        placeholders.join(", ")
    )
}

/// Insert every record into `table`, one row each.
///
/// Each record is read by property name for every column; a record lacking a
/// property binds NULL. On error the in-flight chunk is rolled back (earlier
/// chunks stay committed) and the error is returned. The performance mode in
/// `options` is restored on every exit path.
pub fn write_records<I, R>(
    db: &Database,
    table: &str,
    columns: &[InsertColumn],
    records: I,
    options: &WriteOptions,
    progress: Option<&dyn ImportProgress>,
) -> Result<WriteStats, ImportError>
where
    I: IntoIterator<Item = R>,
    R: Record,
{
    let snapshot = if options.performance == PerformanceMode::default() {
        None
    } else {
        Some(db.apply_performance_mode(options.performance)?)
    };

    let result = write_chunks(db, table, columns, records, options.transaction_set, progress);

    if let Some(snapshot) = snapshot {
        match db.restore_pragmas(&snapshot) {
            Ok(()) => log::debug!("Restored pragmas for {}", db.location()),
            // The write outcome matters more than a failed restore.
            Err(e) if result.is_err() => log::warn!("Failed to restore pragmas: {}", e),
            Err(e) => return Err(e.into()),
        }
    }
    result
}

fn write_chunks<I, R>(
    db: &Database,
    table: &str,
    columns: &[InsertColumn],
    records: I,
    transaction_set: usize,
    progress: Option<&dyn ImportProgress>,
) -> Result<WriteStats, ImportError>
where
    I: IntoIterator<Item = R>,
    R: Record,
{
    let started = Instant::now();
    let mut stats = WriteStats::default();
    let conn = db.connection()?;
    let mut stmt = conn.prepare(&insert_sql(table, columns))?;

    let mut chunk_started = Instant::now();
    let mut in_chunk: u64 = 0;
    db.begin()?;

    for record in records {
        let values = columns.iter().map(|c| {
            let value = record.property(&c.property).unwrap_or(Value::Null);
            coerce_value(value, c.storage_type)
        });
        if let Err(e) = stmt.execute(params_from_iter(values)) {
            abort(db);
            return Err(e.into());
        }
        in_chunk += 1;
        stats.records_written += 1;

        if transaction_set > 0 && in_chunk == transaction_set as u64 {
            let report = commit_chunk(db, &mut stats, in_chunk, chunk_started, started)?;
            if let Some(p) = progress {
                p.on_chunk(&report);
            }
            in_chunk = 0;
            chunk_started = Instant::now();
            db.begin()?;
        }
    }

    if in_chunk > 0 {
        let report = commit_chunk(db, &mut stats, in_chunk, chunk_started, started)?;
        if let Some(p) = progress {
            p.on_chunk(&report);
        }
    } else {
        db.rollback()?;
    }

    stats.elapsed = started.elapsed();
    log::debug!(
        "Wrote {} record(s) to '{}' in {} transaction(s)",
        stats.records_written,
        table,
        stats.transactions_committed
    );
    Ok(stats)
}

fn commit_chunk(
    db: &Database,
    stats: &mut WriteStats,
    chunk_records: u64,
    chunk_started: Instant,
    started: Instant,
) -> Result<ChunkReport, ImportError> {
    if let Err(e) = db.commit() {
        abort(db);
        return Err(e.into());
    }
    stats.transactions_committed += 1;

    let report = ChunkReport {
        records_processed: stats.records_written,
        chunk_records,
        chunk_elapsed: chunk_started.elapsed(),
        total_elapsed: started.elapsed(),
        store_size_bytes: db.size_bytes()?,
        location: db.location().to_string(),
    };
    stats.chunks.push(report.clone());
    Ok(report)
}

/// Roll back whatever is in flight, keeping the original error.
fn abort(db: &Database) {
    match db.in_transaction() {
        Ok(true) => {
            if let Err(e) = db.rollback() {
                log::warn!("Rollback failed: {}", e);
            }
        }
        Ok(false) => {}
        Err(e) => log::warn!("Could not check transaction state: {}", e),
    }
}
