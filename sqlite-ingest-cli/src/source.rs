//! Record sources for `import`: JSON, NDJSON and CSV from a file or stdin.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use sqlite_ingest_core::{Property, Record, Row};

use crate::CliError;
use crate::cli_types::InputFormat;

/// Pick a format from the file extension; JSON when unknown or reading stdin.
pub(crate) fn detect_format(path: Option<&Path>) -> InputFormat {
    let ext = path
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("csv") => InputFormat::Csv,
        Some("ndjson") | Some("jsonl") => InputFormat::Ndjson,
        _ => InputFormat::Json,
    }
}

/// Open `path` for reading, or stdin for `None` and `-`.
pub(crate) fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>, CliError> {
    match path {
        Some(p) if p != Path::new("-") => {
            let file = File::open(p)
                .map_err(|e| CliError::input(format!("Cannot open {}: {}", p.display(), e)))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

/// Iterator of records that stops at the first malformed one.
///
/// The import takes plain records, so a parse failure ends the stream and is
/// parked here; check [`take_error`](Self::take_error) once the import returns.
pub(crate) struct RecordStream {
    inner: Box<dyn Iterator<Item = Result<Row, CliError>>>,
    error: Option<CliError>,
}

impl RecordStream {
    pub(crate) fn new(reader: Box<dyn BufRead>, format: InputFormat) -> Result<Self, CliError> {
        let inner: Box<dyn Iterator<Item = Result<Row, CliError>>> = match format {
            InputFormat::Json => Box::new(json_records(reader)?.into_iter().map(Ok)),
            InputFormat::Ndjson => Box::new(ndjson_records(reader)),
            InputFormat::Csv => Box::new(csv_records(reader)?),
        };
        Ok(Self { inner, error: None })
    }

    pub(crate) fn take_error(&mut self) -> Option<CliError> {
        self.error.take()
    }
}

impl Iterator for RecordStream {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        if self.error.is_some() {
            return None;
        }
        match self.inner.next()? {
            Ok(row) => Some(row),
            Err(e) => {
                self.error = Some(e);
                None
            }
        }
    }
}

fn json_to_row(value: &serde_json::Value) -> Row {
    value.properties().into_iter().collect()
}

/// A whole JSON document: an array of records or a single record.
fn json_records(mut reader: Box<dyn BufRead>) -> Result<Vec<Row>, CliError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let doc: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| CliError::input(format!("Invalid JSON: {}", e)))?;
    Ok(match &doc {
        serde_json::Value::Array(items) => items.iter().map(json_to_row).collect(),
        other => vec![json_to_row(other)],
    })
}

/// One JSON record per line; blank lines are skipped.
fn ndjson_records(reader: Box<dyn BufRead>) -> impl Iterator<Item = Result<Row, CliError>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(i, line)| match line {
            Err(e) => Some(Err(CliError::from(e))),
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(
                serde_json::from_str::<serde_json::Value>(&line)
                    .map(|v| json_to_row(&v))
                    .map_err(|e| CliError::input(format!("Line {}: {}", i + 1, e))),
            ),
        })
}

/// CSV with a header row. Every cell is text; empty cells are text too.
fn csv_records(
    reader: Box<dyn BufRead>,
) -> Result<impl Iterator<Item = Result<Row, CliError>>, CliError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| CliError::input(format!("Invalid CSV header: {}", e)))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    Ok(reader
        .into_records()
        .map(move |record| -> Result<Row, CliError> {
            let record = record.map_err(|e| CliError::input(format!("Invalid CSV: {}", e)))?;
            Ok(headers
                .iter()
                .zip(record.iter())
                .map(|(name, cell)| Property::new(name.clone(), cell))
                .collect::<Row>())
        }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlite_ingest_core::Value;

    fn reader(text: &'static str) -> Box<dyn BufRead> {
        Box::new(io::Cursor::new(text.as_bytes()))
    }

    fn collect(text: &'static str, format: InputFormat) -> (Vec<Row>, Option<CliError>) {
        let mut stream = RecordStream::new(reader(text), format).unwrap();
        let rows: Vec<Row> = stream.by_ref().collect();
        (rows, stream.take_error())
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(detect_format(Some(Path::new("a.CSV"))), InputFormat::Csv);
        assert_eq!(detect_format(Some(Path::new("a.jsonl"))), InputFormat::Ndjson);
        assert_eq!(detect_format(Some(Path::new("a.json"))), InputFormat::Json);
        assert_eq!(detect_format(None), InputFormat::Json);
    }

    #[test]
    fn json_array_and_single_object() {
        let (rows, err) = collect(r#"[{"a": 1}, {"a": 2}]"#, InputFormat::Json);
        assert!(err.is_none());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("a"), Some(&Value::Integer(2)));

        let (rows, _) = collect(r#"{"b": "x"}"#, InputFormat::Json);
        assert_eq!(rows[0].get("b"), Some(&Value::from("x")));
    }

    #[test]
    fn ndjson_stops_at_bad_line() {
        let (rows, err) = collect("{\"a\": 1}\n\n{\"a\": 2}\nnope\n{\"a\": 3}\n", InputFormat::Ndjson);
        assert_eq!(rows.len(), 2);
        assert!(matches!(err, Some(CliError::Input(msg)) if msg.starts_with("Line 4")));
    }

    #[test]
    fn csv_cells_are_text() {
        let (rows, err) = collect("Name, Age\nAda,36\nBob,\n", InputFormat::Csv);
        assert!(err.is_none());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].names().collect::<Vec<_>>(), ["Name", "Age"]);
        assert_eq!(rows[0].get("Age"), Some(&Value::from("36")));
        assert_eq!(rows[1].get("Age"), Some(&Value::from("")));
    }

    #[test]
    fn empty_json_input_has_no_records() {
        let (rows, err) = collect("  \n", InputFormat::Json);
        assert!(rows.is_empty());
        assert!(err.is_none());
    }
}
