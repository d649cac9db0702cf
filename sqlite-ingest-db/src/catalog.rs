//! Read-only views over the store's own metadata: tables, fields, indexes.
//!
//! Nothing here is cached. Every call re-reads `sqlite_master` or the
//! `pragma_*` table-valued functions, so results reflect the store at the
//! moment of the call and may be stale by the next one.

use rusqlite::params;
use sqlite_ingest_core::{StorageType, quote_ident};

use crate::database::Database;
use crate::error::DbError;

/// A table in a store. Holds only the name and creation SQL; pass the
/// owning [`Database`] to read anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    /// `CREATE TABLE` text as stored in the catalog.
    pub sql: Option<String>,
}

/// A column of a table, as reported by `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Name of the owning table.
    pub table: String,
    pub name: String,
    /// Declaration text exactly as written in the schema (may be empty).
    pub declared_type: String,
    pub storage_type: StorageType,
    pub not_null: bool,
    pub default_value: Option<String>,
    /// Zero-based column position.
    pub ordinal: usize,
    pub primary_key: bool,
}

/// How an index came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOrigin {
    /// `CREATE INDEX`.
    Created,
    /// Backs a UNIQUE constraint.
    Unique,
    /// Backs a PRIMARY KEY constraint.
    PrimaryKey,
}

impl IndexOrigin {
    fn from_code(code: &str) -> Self {
        match code {
            "u" => Self::Unique,
            "pk" => Self::PrimaryKey,
            _ => Self::Created,
        }
    }
}

/// An index over one or more fields of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub table: String,
    pub name: String,
    pub unique: bool,
    pub origin: IndexOrigin,
    /// Indexed fields in key order. Expression terms are not listed.
    pub fields: Vec<Field>,
}

impl Index {
    pub fn is_multi_column(&self) -> bool {
        self.fields.len() > 1
    }

    /// Whether `column` (case-insensitive) is one of the indexed fields.
    pub fn covers(&self, column: &str) -> bool {
        self.fields.iter().any(|f| f.name.eq_ignore_ascii_case(column))
    }

    /// Drop this index. Dropping an index that no longer exists is not an
    /// error.
    pub fn remove(&self, db: &Database) -> Result<(), DbError> {
        db.execute(&format!("DROP INDEX IF EXISTS {}", quote_ident(&self.name)))?;
        log::info!("Dropped index '{}' on '{}'", self.name, self.table);
        Ok(())
    }
}

// ── Tables ──────────────────────────────────────────────────────────────────

impl Database {
    /// All user tables in catalog order.
    pub fn tables(&self) -> Result<Vec<Table>, DbError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT name, sql FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\'",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Table {
                name: row.get(0)?,
                sql: row.get(1)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Look up a table by name, ignoring case.
    pub fn table(&self, name: &str) -> Result<Option<Table>, DbError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT name, sql FROM sqlite_master
             WHERE type = 'table' AND name = ?1 COLLATE NOCASE LIMIT 1",
        )?;
        let result = stmt.query_row(params![name], |row| {
            Ok(Table {
                name: row.get(0)?,
                sql: row.get(1)?,
            })
        });
        match result {
            Ok(t) => Ok(Some(t)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl Table {
    /// Columns in declaration order.
    pub fn fields(&self, db: &Database) -> Result<Vec<Field>, DbError> {
        let conn = db.connection()?;
        let mut stmt = conn.prepare(
            "SELECT cid, name, type, \"notnull\", dflt_value, pk
             FROM pragma_table_info(?1) ORDER BY cid",
        )?;
        let rows = stmt.query_map(params![self.name], |row| {
            let declared_type: String = row.get::<_, Option<String>>(2)?.unwrap_or_default();
            Ok(Field {
                table: self.name.clone(),
                name: row.get(1)?,
                storage_type: StorageType::from_declared(&declared_type),
                declared_type,
                not_null: row.get(3)?,
                default_value: row.get(4)?,
                ordinal: row.get::<_, i64>(0)?.max(0) as usize,
                primary_key: row.get::<_, i64>(5)? > 0,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Look up a column by name, ignoring case.
    pub fn field(&self, db: &Database, name: &str) -> Result<Option<Field>, DbError> {
        Ok(self
            .fields(db)?
            .into_iter()
            .find(|f| f.name.eq_ignore_ascii_case(name)))
    }

    /// Indexes on this table, each resolved to the fields it covers.
    pub fn indexes(&self, db: &Database) -> Result<Vec<Index>, DbError> {
        let fields = self.fields(db)?;
        let conn = db.connection()?;

        let mut list = conn.prepare(
            "SELECT name, \"unique\", origin FROM pragma_index_list(?1) ORDER BY seq",
        )?;
        let entries = list
            .query_map(params![self.name], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, bool>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut info = conn.prepare(
            "SELECT name FROM pragma_index_info(?1) WHERE name IS NOT NULL ORDER BY seqno",
        )?;
        let mut indexes = Vec::with_capacity(entries.len());
        for (name, unique, origin) in entries {
            let columns = info
                .query_map(params![name], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            let index_fields = columns
                .iter()
                .filter_map(|col| fields.iter().find(|f| f.name.eq_ignore_ascii_case(col)))
                .cloned()
                .collect();
            indexes.push(Index {
                table: self.name.clone(),
                name,
                unique,
                origin: IndexOrigin::from_code(&origin),
                fields: index_fields,
            });
        }
        Ok(indexes)
    }

    /// Approximate number of rows, taken from the largest row id.
    ///
    /// This is cheap but only an estimate: it overcounts once rows have been
    /// deleted. Empty tables report 0. Fails on `WITHOUT ROWID` tables.
    pub fn approximate_row_count(&self, db: &Database) -> Result<u64, DbError> {
        let conn = db.connection()?;
        let max: Option<i64> = conn.query_row(
            &format!("SELECT MAX(_rowid_) FROM {}", quote_ident(&self.name)),
            [],
            |row| row.get(0),
        )?;
        Ok(max.unwrap_or(0).max(0) as u64)
    }
}
