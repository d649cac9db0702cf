use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Import failed
    #[error("Import error: {0}")]
    Import(String),

    /// Unreadable or malformed input records
    #[error("Input error: {0}")]
    Input(String),

    /// Settings file error
    #[error("Config error: {0}")]
    Config(String),
}

impl CliError {
    pub(crate) fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub(crate) fn import(msg: impl Into<String>) -> Self {
        Self::Import(msg.into())
    }

    pub(crate) fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<sqlite_ingest_db::DbError> for CliError {
    fn from(e: sqlite_ingest_db::DbError) -> Self {
        Self::database(e.to_string())
    }
}

impl From<sqlite_ingest_import::ImportError> for CliError {
    fn from(e: sqlite_ingest_import::ImportError) -> Self {
        Self::import(e.to_string())
    }
}
