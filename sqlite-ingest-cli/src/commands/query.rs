use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use sqlite_ingest_core::{Row, Value};
use sqlite_ingest_db::Database;

use crate::CliError;

use super::truncate_str;

/// Widest a column is drawn in table output.
const MAX_CELL_WIDTH: usize = 40;

pub(crate) fn run_query(
    db: &Database,
    sql: &str,
    ignore_case: bool,
    json: bool,
) -> Result<(), CliError> {
    let rows = if ignore_case {
        db.query_case_insensitive(sql)?
    } else {
        db.query(sql)?
    };

    if json {
        let doc = serde_json::Value::Array(rows.iter().map(row_to_json).collect());
        let text = serde_json::to_string_pretty(&doc)
            .map_err(|e| CliError::database(format!("Failed to encode rows: {}", e)))?;
        println!("{}", text);
        return Ok(());
    }

    if rows.is_empty() {
        log::info!("(no rows)");
        return Ok(());
    }
    for line in render_table(&rows) {
        log::info!("{}", line);
    }
    log::info!(
        "{}",
        format!("({} row(s))", rows.len()).if_supports_color(Stdout, |t| t.dimmed()),
    );
    Ok(())
}

fn row_to_json(row: &Row) -> serde_json::Value {
    serde_json::Value::Object(
        row.names()
            .zip(row.values())
            .map(|(name, value)| (name.to_string(), value.to_json()))
            .collect(),
    )
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        other => truncate_str(&other.to_string(), MAX_CELL_WIDTH),
    }
}

/// Header, separator and one line per row, columns padded to fit.
fn render_table(rows: &[Row]) -> Vec<String> {
    let names: Vec<&str> = rows[0].names().collect();
    let cells: Vec<Vec<String>> = rows.iter().map(|r| r.values().map(cell).collect()).collect();

    let widths: Vec<usize> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .filter_map(|row| row.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |items: Vec<&str>| -> String {
        items
            .iter()
            .zip(&widths)
            .map(|(item, w)| format!("{:<w$}", item, w = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(line(names.clone()));
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in &cells {
        out.push(line(row.iter().map(String::as_str).collect()));
    }
    out
}
