//! sqlite-ingest CLI
//!
//! Command-line interface for loading structured records into SQLite and
//! inspecting the resulting tables.

mod cli_types;
mod commands;
mod error;
mod settings;
mod source;
mod spinner;

use std::io::Write;

use clap::Parser;
use log::{Level, LevelFilter};

use sqlite_ingest_db::Database;

use cli_types::{Cli, Commands, ConfigAction};
use commands::backup::run_backup;
use commands::config::{run_config_path, run_config_set, run_config_show};
use commands::import::run_import;
use commands::index::{run_add_index, run_drop_index};
use commands::query::run_query;
use commands::schema::{run_fields, run_indexes, run_tables};
pub(crate) use error::CliError;
use settings::Settings;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Route `log` output to stdout. Plain messages at the default level;
/// `--verbose` adds timestamps, levels and debug output. `RUST_LOG` wins
/// over both flags.
fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stdout);
    if verbose {
        builder.format_timestamp_millis();
    } else {
        builder.format(|buf, record| match record.level() {
            Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "{}: {}", level, record.args()),
        });
    }
    builder.init();
}

/// Log an empty line at info level.
pub(crate) fn log_blank() {
    log::info!("");
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Config { action } => {
            match action {
                ConfigAction::Show => run_config_show()?,
                ConfigAction::Path => run_config_path(),
                ConfigAction::Set { key, value } => run_config_set(&key, &value)?,
            }
            Ok(())
        }
        command => {
            let settings = Settings::load()?;
            let db = commands::open_database(&settings, cli.db, cli.timeout)?;
            run_on_database(&db, &settings, command, cli.quiet)
        }
    }
}

fn run_on_database(
    db: &Database,
    settings: &Settings,
    command: Commands,
    quiet: bool,
) -> Result<(), CliError> {
    match command {
        Commands::Import {
            file,
            format,
            options,
        } => run_import(db, settings, file, format, options, quiet),
        Commands::Tables => run_tables(db),
        Commands::Fields { table } => run_fields(db, &table),
        Commands::Indexes { table } => run_indexes(db, &table),
        Commands::AddIndex {
            table,
            column,
            name,
            unique,
        } => run_add_index(db, &table, &column, name, unique),
        Commands::DropIndex { table, column } => run_drop_index(db, &table, &column),
        Commands::Query {
            sql,
            ignore_case,
            json,
        } => run_query(db, &sql, ignore_case, json),
        Commands::Backup { target } => run_backup(db, &target),
        Commands::Config { .. } => Ok(()),
    }
}
