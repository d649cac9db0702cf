use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use sqlite_ingest_db::{Database, add_index, drop_index};

use crate::CliError;

/// Default index name for `table.column`.
pub(crate) fn default_index_name(table: &str, column: &str) -> String {
    let clean = |s: &str| -> String {
        s.chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    };
    format!("idx_{}_{}", clean(table), clean(column))
}

pub(crate) fn run_add_index(
    db: &Database,
    table: &str,
    column: &str,
    name: Option<String>,
    unique: bool,
) -> Result<(), CliError> {
    let name = name.unwrap_or_else(|| default_index_name(table, column));
    let index = add_index(db, &name, table, column, unique)?;
    log::info!(
        "{} Created {}index {} on {}({})",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        if index.unique { "unique " } else { "" },
        index.name.if_supports_color(Stdout, |t| t.cyan()),
        index.table,
        column,
    );
    Ok(())
}

pub(crate) fn run_drop_index(db: &Database, table: &str, column: &str) -> Result<(), CliError> {
    let table = db
        .table(table)?
        .ok_or_else(|| CliError::database(format!("Table '{}' not found", table)))?;
    let field = table.field(db, column)?.ok_or_else(|| {
        CliError::database(format!("Field '{}' not found in '{}'", column, table.name))
    })?;

    let dropped = drop_index(db, &field)?;
    if dropped == 0 {
        log::info!("No user-created index on {}({})", table.name, field.name);
    } else {
        log::info!(
            "{} Dropped {} index(es) on {}({})",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            dropped,
            table.name,
            field.name,
        );
    }
    Ok(())
}
