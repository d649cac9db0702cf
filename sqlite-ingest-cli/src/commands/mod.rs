pub(crate) mod backup;
pub(crate) mod config;
pub(crate) mod import;
pub(crate) mod index;
pub(crate) mod query;
pub(crate) mod schema;

use sqlite_ingest_db::{Database, DatabaseOptions, Location};

use crate::CliError;
use crate::settings::Settings;

/// Open the database named by `--db` (or the settings file).
pub(crate) fn open_database(
    settings: &Settings,
    db: Option<String>,
    timeout: Option<u64>,
) -> Result<Database, CliError> {
    let location = Location::parse(&settings.database(db));
    let options = DatabaseOptions::new().query_timeout(settings.query_timeout(timeout));
    let database = Database::new(location, options)?;
    database.open()?;
    Ok(database)
}

/// Truncate a string to a maximum width, appending "..." if needed.
pub(crate) fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate_str("abc", 5), "abc");
        assert_eq!(truncate_str("abcdefgh", 6), "abc...");
        assert_eq!(truncate_str("abcdef", 2), "ab");
        assert_eq!(truncate_str("ünïcödé", 5), "ün...");
    }
}
