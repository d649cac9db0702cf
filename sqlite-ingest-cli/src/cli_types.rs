//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "sqlite-ingest")]
#[command(about = "Load structured records into SQLite tables", long_about = None)]
pub(crate) struct Cli {
    /// Database file, or ":memory:" (default: settings file, then ./ingest.sqlite)
    #[arg(short, long, global = true)]
    pub db: Option<String>,

    /// Seconds a statement waits on a locked database before failing
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Input encodings accepted by `import`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum InputFormat {
    /// A JSON array of objects (or a single object)
    Json,
    /// One JSON object per line
    Ndjson,
    /// Comma-separated values with a header row
    Csv,
}

/// Flags that shape an import.
#[derive(Args, Clone)]
pub(crate) struct ImportArgs {
    /// Target table (created from the first record if absent)
    #[arg(short, long)]
    pub table: String,

    /// Records per committed transaction; 0 = a single transaction
    #[arg(long)]
    pub transaction_set: Option<usize>,

    /// In-memory journal and no fsync during the load (unsafe on crash)
    #[arg(long)]
    pub unsafe_performance: bool,

    /// Hold an exclusive lock on the database during the load
    #[arg(long)]
    pub lock: bool,

    /// Create or check the table from the first record, write nothing
    #[arg(long)]
    pub define_only: bool,

    /// Convert values to an existing column's type instead of failing
    #[arg(long)]
    pub allow_type_conversion: bool,

    /// Print the target table's fields after the import
    #[arg(long)]
    pub pass_thru: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Import records from a file or stdin
    Import {
        /// Input file (reads stdin when omitted or "-")
        file: Option<PathBuf>,

        /// Input format (default: from the file extension, else JSON)
        #[arg(short, long, value_enum)]
        format: Option<InputFormat>,

        #[command(flatten)]
        options: ImportArgs,
    },

    /// List tables
    Tables,

    /// List the fields of a table
    Fields {
        table: String,
    },

    /// List the indexes of a table
    Indexes {
        table: String,
    },

    /// Create an index on one column
    AddIndex {
        table: String,

        column: String,

        /// Index name (default: idx_<table>_<column>)
        #[arg(short, long)]
        name: Option<String>,

        /// Reject duplicate values
        #[arg(short, long)]
        unique: bool,
    },

    /// Drop every user-created index on a column
    DropIndex {
        table: String,

        column: String,
    },

    /// Run SQL and print the rows
    Query {
        sql: String,

        /// Compare text case-insensitively (appends COLLATE NOCASE)
        #[arg(short, long)]
        ignore_case: bool,

        /// Print rows as a JSON array instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Copy the database to a file
    Backup {
        target: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the settings file and the values in effect
    Show,

    /// Print the settings file path
    Path,

    /// Set a default (database, query_timeout_secs, transaction_set)
    Set {
        key: String,

        value: String,
    },
}
