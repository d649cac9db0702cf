//! Record model shared by the sqlite-ingest crates.
//!
//! Defines the values a record carries, the `Record` trait that lets any
//! type describe its properties, and the closed set of storage types a
//! column may take.

pub mod record;
pub mod storage_type;
pub mod util;
pub mod value;

pub use record::{Property, Record, Row, TypeHint};
pub use storage_type::{StorageType, StorageTypeParseError};
pub use util::{format_bytes_approx, quote_ident};
pub use value::{ARRAY_DELIMITER, DATETIME_FORMAT, Value};
