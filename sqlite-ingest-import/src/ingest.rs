//! The ingestion entry point: infer, reconcile, write.

use std::time::{Duration, Instant};

use sqlite_ingest_core::Record;
use sqlite_ingest_db::{Database, PerformanceMode, Table};

use crate::error::{ImportError, ImportWarning};
use crate::infer::infer_columns;
use crate::progress::ImportProgress;
use crate::reconcile::reconcile;
use crate::writer::{WriteOptions, write_records};

/// Records per committed transaction unless told otherwise.
pub const DEFAULT_TRANSACTION_SET: usize = 50_000;

/// Page size requested before the first table is created.
pub const INGEST_PAGE_SIZE: u32 = 65_536;

/// Options for [`import_records`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    pub table_name: String,
    /// Records per committed transaction; 0 means a single transaction.
    pub transaction_set: usize,
    /// In-memory journal, no fsync.
    pub unsafe_performance: bool,
    /// Exclusive lock for the duration of the import.
    pub lock_database: bool,
    /// Create or validate the table from the first record, write nothing.
    pub define_table_only: bool,
    /// Coerce values to an existing column's type instead of failing.
    pub allow_type_conversion: bool,
    /// Return the target table handle in the outcome.
    pub pass_thru: bool,
}

impl ImportOptions {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            transaction_set: DEFAULT_TRANSACTION_SET,
            unsafe_performance: false,
            lock_database: false,
            define_table_only: false,
            allow_type_conversion: false,
            pass_thru: false,
        }
    }

    pub fn transaction_set(mut self, records: usize) -> Self {
        self.transaction_set = records;
        self
    }

    pub fn unsafe_performance(mut self, on: bool) -> Self {
        self.unsafe_performance = on;
        self
    }

    pub fn lock_database(mut self, on: bool) -> Self {
        self.lock_database = on;
        self
    }

    pub fn define_table_only(mut self, on: bool) -> Self {
        self.define_table_only = on;
        self
    }

    pub fn allow_type_conversion(mut self, on: bool) -> Self {
        self.allow_type_conversion = on;
        self
    }

    pub fn pass_thru(mut self, on: bool) -> Self {
        self.pass_thru = on;
        self
    }

    fn performance(&self) -> PerformanceMode {
        PerformanceMode {
            unsafe_writes: self.unsafe_performance,
            exclusive_lock: self.lock_database,
        }
    }
}

/// Statistics from a completed import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportStats {
    /// Target table as stored in the catalog.
    pub table: String,
    pub table_created: bool,
    pub records_written: u64,
    pub transactions_committed: u64,
    /// Columns written to.
    pub columns: Vec<String>,
    /// Record properties the table lacks.
    pub missing_fields: Vec<String>,
    pub elapsed: Duration,
}

/// Everything an import hands back.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub stats: ImportStats,
    pub warnings: Vec<ImportWarning>,
    /// Present when [`ImportOptions::pass_thru`] was set and a table exists.
    pub table: Option<Table>,
}

/// Import a stream of records into `options.table_name`.
///
/// The first record decides the column layout. The table is created if it
/// does not exist; otherwise it must share at least one field with the
/// record. An empty stream does nothing and creates nothing.
pub fn import_records<I, R>(
    db: &Database,
    records: I,
    options: &ImportOptions,
    progress: Option<&dyn ImportProgress>,
) -> Result<ImportOutcome, ImportError>
where
    I: IntoIterator<Item = R>,
    R: Record,
{
    let started = Instant::now();
    let mut records = records.into_iter();
    let Some(first) = records.next() else {
        log::debug!("No records to import into '{}'", options.table_name);
        return Ok(ImportOutcome {
            stats: ImportStats {
                table: options.table_name.clone(),
                ..ImportStats::default()
            },
            warnings: Vec::new(),
            table: None,
        });
    };

    db.open()?;
    if db.tables()?.is_empty() {
        db.set_page_size(INGEST_PAGE_SIZE)?;
    }

    let inferred = infer_columns(&first);
    if let Some(p) = progress {
        p.on_phase(&format!(
            "Preparing table '{}' ({} field(s))",
            options.table_name,
            inferred.len()
        ));
    }
    let plan = reconcile(
        db,
        &options.table_name,
        &inferred,
        options.allow_type_conversion,
    )?;

    let mut stats = ImportStats {
        table: plan.table.clone(),
        table_created: plan.created,
        columns: plan.columns.iter().map(|c| c.column.clone()).collect(),
        missing_fields: plan.missing.clone(),
        ..ImportStats::default()
    };

    if options.define_table_only {
        log::info!("Table '{}' defined; no records written", plan.table);
    } else {
        if let Some(p) = progress {
            p.on_phase(&format!("Importing into '{}'", plan.table));
        }
        let write = write_records(
            db,
            &plan.table,
            &plan.columns,
            std::iter::once(first).chain(records),
            &WriteOptions {
                transaction_set: options.transaction_set,
                performance: options.performance(),
            },
            progress,
        )?;
        stats.records_written = write.records_written;
        stats.transactions_committed = write.transactions_committed;
    }
    stats.elapsed = started.elapsed();

    if let Some(p) = progress {
        p.on_complete(&stats);
    }

    let table = if options.pass_thru {
        db.table(&plan.table)?
    } else {
        None
    };
    Ok(ImportOutcome {
        stats,
        warnings: plan.warnings,
        table,
    })
}
