//! The store handle: one location, at most one live connection.

use std::cell::{Ref, RefCell};
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, DatabaseName, Params};
use sqlite_ingest_core::{Property, Row, Value};

use crate::error::DbError;

/// Reserved location string for an in-memory store.
pub const MEMORY_MARKER: &str = ":memory:";

/// Default time a statement waits on a locked store before failing.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(600);

/// File extensions that don't trigger the advisory warning.
const KNOWN_EXTENSIONS: &[&str] = &["sqlite", "sqlite3", "db", "db3"];

/// Where a store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Memory,
    File(PathBuf),
}

impl Location {
    /// Parse a location string. [`MEMORY_MARKER`] selects an in-memory
    /// store; anything else is a file path.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case(MEMORY_MARKER) {
            Self::Memory
        } else {
            Self::File(PathBuf::from(s))
        }
    }

    pub fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => f.write_str(MEMORY_MARKER),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl From<&str> for Location {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<PathBuf> for Location {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<&Path> for Location {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

/// Connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseOptions {
    /// How long a statement may wait on a locked store before it fails.
    pub query_timeout: Duration,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}

impl DatabaseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }
}

/// Durability/locking trade-offs that can be switched on for a bulk load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerformanceMode {
    /// In-memory journal and no fsync. A crash mid-write can corrupt the store.
    pub unsafe_writes: bool,
    /// Hold an exclusive lock on the store, blocking every other accessor.
    pub exclusive_lock: bool,
}

/// Raw pragma values captured before a performance mode is applied, so the
/// exact prior state can be put back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PragmaSnapshot {
    pub journal_mode: String,
    pub synchronous: i64,
    pub locking_mode: String,
}

impl PragmaSnapshot {
    /// The performance mode this snapshot corresponds to.
    pub fn mode(&self) -> PerformanceMode {
        PerformanceMode {
            unsafe_writes: self.journal_mode.eq_ignore_ascii_case("memory")
                && self.synchronous == 0,
            exclusive_lock: self.locking_mode.eq_ignore_ascii_case("exclusive"),
        }
    }
}

/// One store and its (lazily opened) connection.
///
/// Every operation opens the connection on first use. The handle is not
/// meant to be shared between threads; use one `Database` per thread and let
/// SQLite's file locking arbitrate.
pub struct Database {
    location: Location,
    options: DatabaseOptions,
    conn: RefCell<Option<Connection>>,
}

impl Database {
    /// Create a handle for `location`. File paths are validated here; the
    /// connection itself is opened on first use.
    pub fn new(location: impl Into<Location>, options: DatabaseOptions) -> Result<Self, DbError> {
        let location = location.into();
        if let Location::File(path) = &location {
            validate_path(path)?;
        }
        Ok(Self {
            location,
            options,
            conn: RefCell::new(None),
        })
    }

    /// A fresh in-memory store with default options.
    pub fn memory() -> Self {
        Self {
            location: Location::Memory,
            options: DatabaseOptions::default(),
            conn: RefCell::new(None),
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn query_timeout(&self) -> Duration {
        self.options.query_timeout
    }

    /// Change the query timeout. Applies immediately when open.
    pub fn set_query_timeout(&mut self, timeout: Duration) -> Result<(), DbError> {
        self.options.query_timeout = timeout;
        if let Some(conn) = self.conn.get_mut().as_ref() {
            conn.busy_timeout(timeout)?;
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.conn.borrow().is_some()
    }

    /// Open the connection. Does nothing if already open.
    pub fn open(&self) -> Result<(), DbError> {
        if self.is_open() {
            return Ok(());
        }

        let connection_error = |source| DbError::Connection {
            location: self.location.to_string(),
            source,
        };

        let conn = match &self.location {
            Location::Memory => Connection::open_in_memory(),
            Location::File(path) => Connection::open(path),
        }
        .map_err(connection_error)?;
        conn.busy_timeout(self.options.query_timeout)
            .map_err(connection_error)?;
        // Opening is lazy inside SQLite too; touch the schema so permission
        // and lock problems surface here rather than on the first statement.
        conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
            .map_err(connection_error)?;

        log::debug!("Opened database at {}", self.location);
        *self.conn.borrow_mut() = Some(conn);
        Ok(())
    }

    /// Close the connection. For an in-memory store this discards all data.
    pub fn close(&mut self) -> Result<(), DbError> {
        if let Some(conn) = self.conn.get_mut().take() {
            conn.close().map_err(|(_, e)| DbError::Sqlite(e))?;
            log::debug!("Closed database at {}", self.location);
        }
        Ok(())
    }

    /// Borrow the live connection, opening it if needed.
    pub fn connection(&self) -> Result<Ref<'_, Connection>, DbError> {
        self.open()?;
        Ref::filter_map(self.conn.borrow(), Option::as_ref).map_err(|_| DbError::NotOpen)
    }

    // ── Queries ─────────────────────────────────────────────────────────────

    /// Run SQL and collect every result row.
    pub fn query(&self, sql: &str) -> Result<Vec<Row>, DbError> {
        self.query_with(sql, [])
    }

    /// Run SQL with bound parameters and collect every result row.
    pub fn query_with<P: Params>(&self, sql: &str, params: P) -> Result<Vec<Row>, DbError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(sql)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let rows = stmt.query_map(params, |row| {
            names
                .iter()
                .enumerate()
                .map(|(i, name)| Ok(Property::new(name.clone(), row.get::<_, Value>(i)?)))
                .collect::<rusqlite::Result<Row>>()
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Like [`query`](Self::query), with text comparisons made
    /// case-insensitive by a trailing `COLLATE NOCASE`.
    pub fn query_case_insensitive(&self, sql: &str) -> Result<Vec<Row>, DbError> {
        self.query(&with_nocase(sql))
    }

    /// Run a single statement and return the number of changed rows.
    pub fn execute(&self, sql: &str) -> Result<usize, DbError> {
        Ok(self.connection()?.execute(sql, [])?)
    }

    // ── Transactions ────────────────────────────────────────────────────────

    pub fn begin(&self) -> Result<(), DbError> {
        self.connection()?.execute_batch("BEGIN")?;
        Ok(())
    }

    pub fn commit(&self) -> Result<(), DbError> {
        self.connection()?.execute_batch("COMMIT")?;
        Ok(())
    }

    pub fn rollback(&self) -> Result<(), DbError> {
        self.connection()?.execute_batch("ROLLBACK")?;
        Ok(())
    }

    pub fn in_transaction(&self) -> Result<bool, DbError> {
        Ok(!self.connection()?.is_autocommit())
    }

    // ── Tunables ────────────────────────────────────────────────────────────

    /// Capture the pragmas a performance mode touches.
    pub fn pragma_snapshot(&self) -> Result<PragmaSnapshot, DbError> {
        let conn = self.connection()?;
        Ok(PragmaSnapshot {
            journal_mode: conn.pragma_query_value(None, "journal_mode", |row| row.get(0))?,
            synchronous: conn.pragma_query_value(None, "synchronous", |row| row.get(0))?,
            locking_mode: conn.pragma_query_value(None, "locking_mode", |row| row.get(0))?,
        })
    }

    pub fn performance_mode(&self) -> Result<PerformanceMode, DbError> {
        Ok(self.pragma_snapshot()?.mode())
    }

    /// Switch to `mode`, returning the previous state for
    /// [`restore_pragmas`](Self::restore_pragmas).
    pub fn apply_performance_mode(&self, mode: PerformanceMode) -> Result<PragmaSnapshot, DbError> {
        let previous = self.pragma_snapshot()?;
        let conn = self.connection()?;

        if mode.unsafe_writes {
            conn.pragma_update_and_check(None, "journal_mode", "MEMORY", |row| {
                row.get::<_, String>(0)
            })?;
            conn.pragma_update(None, "synchronous", "OFF")?;
        } else if !self.location.is_memory() {
            conn.pragma_update_and_check(None, "journal_mode", "DELETE", |row| {
                row.get::<_, String>(0)
            })?;
            conn.pragma_update(None, "synchronous", "FULL")?;
        }
        let locking = if mode.exclusive_lock { "EXCLUSIVE" } else { "NORMAL" };
        conn.pragma_update_and_check(None, "locking_mode", locking, |row| {
            row.get::<_, String>(0)
        })?;

        log::debug!(
            "Performance mode for {}: unsafe_writes={}, exclusive_lock={}",
            self.location,
            mode.unsafe_writes,
            mode.exclusive_lock,
        );
        Ok(previous)
    }

    /// Put back pragmas captured by [`pragma_snapshot`](Self::pragma_snapshot).
    pub fn restore_pragmas(&self, snapshot: &PragmaSnapshot) -> Result<(), DbError> {
        let conn = self.connection()?;
        conn.pragma_update_and_check(None, "journal_mode", &snapshot.journal_mode, |row| {
            row.get::<_, String>(0)
        })?;
        conn.pragma_update(None, "synchronous", snapshot.synchronous)?;
        conn.pragma_update_and_check(None, "locking_mode", &snapshot.locking_mode, |row| {
            row.get::<_, String>(0)
        })?;
        // Leaving EXCLUSIVE mode keeps the file lock until the next read.
        if !snapshot.locking_mode.eq_ignore_ascii_case("exclusive") && conn.is_autocommit() {
            conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
                row.get::<_, i64>(0)
            })?;
        }
        Ok(())
    }

    /// Set the page size. Only takes effect on a store with no content yet
    /// (or after a VACUUM), which is the case when an import creates it.
    pub fn set_page_size(&self, bytes: u32) -> Result<(), DbError> {
        self.connection()?.pragma_update(None, "page_size", bytes)?;
        Ok(())
    }

    /// Current store size in bytes (page count × page size).
    pub fn size_bytes(&self) -> Result<u64, DbError> {
        let conn = self.connection()?;
        let pages: i64 = conn.pragma_query_value(None, "page_count", |row| row.get(0))?;
        let page_size: i64 = conn.pragma_query_value(None, "page_size", |row| row.get(0))?;
        Ok((pages.max(0) as u64) * (page_size.max(0) as u64))
    }

    // ── Backup ──────────────────────────────────────────────────────────────

    /// Copy the whole store, as of now, into a file at `target`. Works for
    /// in-memory stores too.
    pub fn backup(&self, target: &Path) -> Result<(), DbError> {
        if target.exists() {
            log::warn!("Backup target {} exists and will be overwritten", target.display());
        }
        validate_path(target)?;
        self.connection()?.backup(DatabaseName::Main, target, None)?;
        log::info!("Backed up {} to {}", self.location, target.display());
        Ok(())
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("location", &self.location)
            .field("options", &self.options)
            .field("open", &self.is_open())
            .finish()
    }
}

/// Append `COLLATE NOCASE` to a statement unless it already has one.
pub fn with_nocase(sql: &str) -> String {
    let trimmed = sql.trim().trim_end_matches(';').trim_end();
    if trimmed.to_ascii_uppercase().contains("COLLATE NOCASE") {
        trimmed.to_string()
    } else {
        format!("{} COLLATE NOCASE", trimmed)
    }
}

/// Reject paths SQLite cannot create a store at, and warn on unusual
/// extensions.
fn validate_path(path: &Path) -> Result<(), DbError> {
    let invalid = |reason: &str| DbError::InvalidPath {
        path: path.display().to_string(),
        reason: reason.to_string(),
    };

    if path.as_os_str().is_empty() {
        return Err(invalid("path is empty"));
    }
    if path.is_dir() {
        return Err(invalid("path is a directory"));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.is_dir() {
            return Err(invalid("parent directory does not exist"));
        }
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let known = extension
        .as_deref()
        .is_some_and(|e| KNOWN_EXTENSIONS.contains(&e));
    if !known {
        log::warn!(
            "{} does not use a common SQLite extension ({})",
            path.display(),
            KNOWN_EXTENSIONS.join(", "),
        );
    }
    Ok(())
}
