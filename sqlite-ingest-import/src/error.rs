use sqlite_ingest_core::StorageType;
use sqlite_ingest_db::DbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error(
        "Field '{field}' of table '{table}' is {existing} but the record supplies {inferred} (allow type conversion to import anyway)"
    )]
    SchemaMismatch {
        table: String,
        field: String,
        existing: StorageType,
        inferred: StorageType,
    },

    #[error("None of the record's fields ({}) exist in table '{table}'", .fields.join(", "))]
    NoMatchingFields { table: String, fields: Vec<String> },

    #[error("The first record has no properties; cannot derive a table schema")]
    EmptyRecord,
}

/// A recoverable reconciliation decision. The import goes ahead; the caller
/// gets the list back alongside the results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportWarning {
    /// The record has a property the table lacks; its values are not written.
    MissingField { table: String, field: String },
    /// Types disagreed and conversion was allowed; values are coerced to the
    /// existing column's type.
    TypeAdopted {
        table: String,
        field: String,
        existing: StorageType,
        inferred: StorageType,
    },
    /// Two properties differ only by case; the later one is ignored.
    DuplicateProperty { name: String },
}

impl std::fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { table, field } => write!(
                f,
                "Field '{}' does not exist in table '{}'; its values will not be imported",
                field, table
            ),
            Self::TypeAdopted {
                table,
                field,
                existing,
                inferred,
            } => write!(
                f,
                "Field '{}' of table '{}' is {}; converting {} values",
                field, table, existing, inferred
            ),
            Self::DuplicateProperty { name } => write!(
                f,
                "Property '{}' appears more than once (names are case-insensitive); keeping the first",
                name
            ),
        }
    }
}
