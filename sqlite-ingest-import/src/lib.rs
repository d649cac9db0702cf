//! Ingest structured records into SQLite tables.
//!
//! This crate owns the load path: inferring a column layout from a record,
//! reconciling it with whatever table already exists, and streaming records
//! in through committed chunks.

pub mod coerce;
pub mod error;
pub mod infer;
pub mod ingest;
pub mod progress;
pub mod reconcile;
pub mod writer;

pub use coerce::{coerce_value, parse_datetime};
pub use error::{ImportError, ImportWarning};
pub use infer::{ColumnSpec, infer_columns, infer_property};
pub use ingest::{
    DEFAULT_TRANSACTION_SET, INGEST_PAGE_SIZE, ImportOptions, ImportOutcome, ImportStats,
    import_records,
};
pub use progress::{ChunkReport, ImportProgress, LogProgress, SilentProgress};
pub use reconcile::{InsertColumn, Reconciliation, create_table_sql, reconcile};
pub use writer::{WriteOptions, WriteStats, insert_sql, write_records};
