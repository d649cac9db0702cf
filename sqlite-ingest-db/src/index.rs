//! Creating and dropping single-column indexes.

use rusqlite::ErrorCode;
use sqlite_ingest_core::quote_ident;

use crate::catalog::{Field, Index, IndexOrigin};
use crate::database::Database;
use crate::error::DbError;

/// Above this many (approximate) rows, index creation logs a warning first.
pub const LARGE_TABLE_ROWS: u64 = 1_000_000;

/// Create an index named `name` on `table.column`.
///
/// A column may carry only one index; if any index already covers it this
/// fails with [`DbError::DuplicateIndex`]. A unique index over a column that
/// already holds duplicates fails with [`DbError::UniqueConstraint`] and
/// leaves nothing behind.
pub fn add_index(
    db: &Database,
    name: &str,
    table: &str,
    column: &str,
    unique: bool,
) -> Result<Index, DbError> {
    let table = db
        .table(table)?
        .ok_or_else(|| DbError::TableNotFound(table.to_string()))?;
    let field = table
        .field(db, column)?
        .ok_or_else(|| DbError::FieldNotFound {
            table: table.name.clone(),
            field: column.to_string(),
        })?;

    if let Some(existing) = table
        .indexes(db)?
        .into_iter()
        .find(|idx| idx.covers(&field.name))
    {
        return Err(DbError::DuplicateIndex {
            table: table.name,
            column: field.name,
            existing: existing.name,
        });
    }

    match table.approximate_row_count(db) {
        Ok(rows) if rows > LARGE_TABLE_ROWS => log::warn!(
            "Table '{}' holds roughly {} rows; building index '{}' may take a while",
            table.name,
            rows,
            name,
        ),
        Ok(_) => {}
        Err(e) => log::debug!("Skipping size check for '{}': {}", table.name, e),
    }

    let sql = format!(
        "CREATE {}INDEX {} ON {} ({})",
        if unique { "UNIQUE " } else { "" },
        quote_ident(name),
        quote_ident(&table.name),
        quote_ident(&field.name),
    );
    match db.execute(&sql) {
        Ok(_) => {}
        Err(DbError::Sqlite(rusqlite::Error::SqliteFailure(err, _)))
            if err.code == ErrorCode::ConstraintViolation =>
        {
            return Err(DbError::UniqueConstraint {
                index: name.to_string(),
                table: table.name,
                column: field.name,
            });
        }
        Err(e) => return Err(e),
    }
    log::info!(
        "Created {}index '{}' on {}({})",
        if unique { "unique " } else { "" },
        name,
        table.name,
        field.name,
    );

    table
        .indexes(db)?
        .into_iter()
        .find(|idx| idx.name.eq_ignore_ascii_case(name))
        .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
}

/// Drop every index that covers `field`. Returns how many were dropped.
///
/// Indexes backing UNIQUE or PRIMARY KEY constraints cannot be dropped and
/// are skipped. A field with no index (or a table that has since gone) is not
/// an error.
pub fn drop_index(db: &Database, field: &Field) -> Result<usize, DbError> {
    let Some(table) = db.table(&field.table)? else {
        return Ok(0);
    };

    let mut dropped = 0;
    for index in table.indexes(db)? {
        if index.origin != IndexOrigin::Created || !index.covers(&field.name) {
            continue;
        }
        index.remove(db)?;
        dropped += 1;
    }
    if dropped == 0 {
        log::debug!("No index on {}({}) to drop", field.table, field.name);
    }
    Ok(dropped)
}
