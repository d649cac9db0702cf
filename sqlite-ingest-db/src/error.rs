use thiserror::Error;

/// Errors raised by the store layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// The engine could not open the store. SQLite rarely says why
    /// (permissions, disk space, a competing lock), so the location is
    /// always part of the message.
    #[error("Failed to open database at {location}: {source}")]
    Connection {
        location: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Invalid database path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Database connection is not open")]
    NotOpen,

    #[error("Table not found: '{0}'")]
    TableNotFound(String),

    #[error("Field '{field}' not found in table '{table}'")]
    FieldNotFound { table: String, field: String },

    #[error("Column '{column}' of table '{table}' is already indexed by '{existing}'")]
    DuplicateIndex {
        table: String,
        column: String,
        existing: String,
    },

    #[error(
        "Cannot create unique index '{index}': column '{column}' of table '{table}' contains duplicate values"
    )]
    UniqueConstraint {
        index: String,
        table: String,
        column: String,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
