use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use sqlite_ingest_db::Database;
use sqlite_ingest_import::{ImportOptions, import_records};

use crate::CliError;
use crate::cli_types::{ImportArgs, InputFormat};
use crate::settings::Settings;
use crate::source::{RecordStream, detect_format, open_input};
use crate::spinner::SpinnerProgress;

/// Import records from `file` (or stdin) into a table.
pub(crate) fn run_import(
    db: &Database,
    settings: &Settings,
    file: Option<PathBuf>,
    format: Option<InputFormat>,
    args: ImportArgs,
    quiet: bool,
) -> Result<(), CliError> {
    let format = format.unwrap_or_else(|| detect_format(file.as_deref()));
    let mut records = RecordStream::new(open_input(file.as_deref())?, format)?;

    let options = ImportOptions::new(&args.table)
        .transaction_set(settings.transaction_set(args.transaction_set))
        .unsafe_performance(args.unsafe_performance)
        .lock_database(args.lock)
        .define_table_only(args.define_only)
        .allow_type_conversion(args.allow_type_conversion)
        .pass_thru(args.pass_thru);

    let source = file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdin".to_string());
    log::info!(
        "{}",
        format!("Importing {} into {}", source, db.location())
            .if_supports_color(Stdout, |t| t.bold()),
    );

    let progress = SpinnerProgress::new(quiet);
    let result = import_records(db, records.by_ref(), &options, Some(&progress));
    progress.finish();
    let outcome = result?;

    if let Some(err) = records.take_error() {
        log::warn!(
            "  {} Stopped after {} record(s); earlier chunks are committed",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            outcome.stats.records_written,
        );
        return Err(err);
    }

    let stats = &outcome.stats;
    if stats.columns.is_empty() {
        log::warn!("No records found in {}", source);
        return Ok(());
    }

    log::info!(
        "{} {} '{}' ({} column(s))",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        if stats.table_created { "Created" } else { "Using" },
        stats.table.if_supports_color(Stdout, |t| t.cyan()),
        stats.columns.len(),
    );
    if args.define_only {
        log::info!("  Table defined only; no records written");
    } else {
        log::info!(
            "  {} record(s) in {} transaction(s), {:.2}s",
            stats.records_written,
            stats.transactions_committed,
            stats.elapsed.as_secs_f64(),
        );
    }
    if !stats.missing_fields.is_empty() {
        log::info!(
            "  {} {}",
            "Skipped fields:".if_supports_color(Stdout, |t| t.dimmed()),
            stats.missing_fields.join(", "),
        );
    }

    if let Some(table) = &outcome.table {
        crate::log_blank();
        super::schema::print_fields(db, table)?;
    }
    Ok(())
}
