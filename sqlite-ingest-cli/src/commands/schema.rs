//! `tables`, `fields` and `indexes`.

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use sqlite_ingest_db::{Database, IndexOrigin, Table};

use crate::CliError;

use super::truncate_str;

fn require_table(db: &Database, name: &str) -> Result<Table, CliError> {
    db.table(name)?
        .ok_or_else(|| CliError::database(format!("Table '{}' not found", name)))
}

pub(crate) fn run_tables(db: &Database) -> Result<(), CliError> {
    let tables = db.tables()?;
    if tables.is_empty() {
        log::info!("No tables in {}", db.location());
        return Ok(());
    }

    log::info!(
        "{}",
        format!("Tables in {}", db.location()).if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();
    for table in &tables {
        let fields = table.fields(db)?.len();
        let rows = table
            .approximate_row_count(db)
            .map_or_else(|_| "?".to_string(), |n| n.to_string());
        log::info!(
            "  {:<30} {:>4} field(s)  ~{} row(s)",
            truncate_str(&table.name, 30).if_supports_color(Stdout, |t| t.cyan()),
            fields,
            rows,
        );
    }
    Ok(())
}

pub(crate) fn run_fields(db: &Database, table: &str) -> Result<(), CliError> {
    let table = require_table(db, table)?;
    print_fields(db, &table)
}

/// Print one line per field of `table`.
pub(crate) fn print_fields(db: &Database, table: &Table) -> Result<(), CliError> {
    log::info!(
        "{}",
        format!("Fields of '{}'", table.name).if_supports_color(Stdout, |t| t.bold()),
    );
    for field in table.fields(db)? {
        let mut notes = Vec::new();
        if field.primary_key {
            notes.push("primary key".to_string());
        }
        if field.not_null {
            notes.push("not null".to_string());
        }
        if let Some(default) = &field.default_value {
            notes.push(format!("default {}", default));
        }
        log::info!(
            "  {:>3}  {:<30} {:<10} {}",
            field.ordinal,
            truncate_str(&field.name, 30).if_supports_color(Stdout, |t| t.cyan()),
            field.storage_type.label(),
            notes.join(", ").if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}

pub(crate) fn run_indexes(db: &Database, table: &str) -> Result<(), CliError> {
    let table = require_table(db, table)?;
    let indexes = table.indexes(db)?;
    if indexes.is_empty() {
        log::info!("No indexes on '{}'", table.name);
        return Ok(());
    }

    log::info!(
        "{}",
        format!("Indexes on '{}'", table.name).if_supports_color(Stdout, |t| t.bold()),
    );
    for index in &indexes {
        let columns: Vec<&str> = index.fields.iter().map(|f| f.name.as_str()).collect();
        let kind = match index.origin {
            IndexOrigin::Created if index.unique => "unique",
            IndexOrigin::Created => "",
            IndexOrigin::Unique => "unique constraint",
            IndexOrigin::PrimaryKey => "primary key",
        };
        log::info!(
            "  {:<30} ({}) {}",
            truncate_str(&index.name, 30).if_supports_color(Stdout, |t| t.cyan()),
            columns.join(", "),
            kind.if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}
