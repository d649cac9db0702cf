//! SQLite store layer for sqlite-ingest.
//!
//! Provides the `Database` handle (location, lazy connection, pragmas,
//! backup), read-only catalog views over tables, fields, and indexes, and
//! single-column index management. Backed by rusqlite with the bundled
//! SQLite.

pub mod catalog;
pub mod database;
pub mod error;
pub mod index;

pub use catalog::{Field, Index, IndexOrigin, Table};
pub use database::{
    DEFAULT_QUERY_TIMEOUT, Database, DatabaseOptions, Location, MEMORY_MARKER, PerformanceMode,
    PragmaSnapshot, with_nocase,
};
pub use error::DbError;
pub use index::{LARGE_TABLE_ROWS, add_index, drop_index};
