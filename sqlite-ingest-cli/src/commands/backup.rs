use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use sqlite_ingest_core::format_bytes_approx;
use sqlite_ingest_db::Database;

use crate::CliError;

pub(crate) fn run_backup(db: &Database, target: &Path) -> Result<(), CliError> {
    let size = db.size_bytes()?;
    db.backup(target)?;
    log::info!(
        "{} Backed up {} ({}) to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        db.location(),
        format_bytes_approx(size),
        target.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}
