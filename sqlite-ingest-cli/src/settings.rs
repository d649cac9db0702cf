//! Settings file: `~/.config/sqlite-ingest/settings.toml`.
//!
//! Only the `[defaults]` table is read. Every value there is a fallback; a
//! command-line flag always wins.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::CliError;

/// Database used when neither `--db` nor the settings file names one.
pub(crate) const FALLBACK_DATABASE: &str = "ingest.sqlite";

/// Keys accepted under `[defaults]`.
pub(crate) const DEFAULT_KEYS: &[&str] = &["database", "query_timeout_secs", "transaction_set"];

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Settings {
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Defaults {
    pub database: Option<String>,
    pub query_timeout_secs: Option<u64>,
    pub transaction_set: Option<usize>,
}

/// Canonical path to the settings file.
pub(crate) fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("sqlite-ingest").join("settings.toml")
}

impl Settings {
    /// Load the settings file. A missing file yields the defaults; a file
    /// that exists but does not parse is an error.
    pub(crate) fn load() -> Result<Self, CliError> {
        Self::load_from(&settings_path())
    }

    pub(crate) fn load_from(path: &Path) -> Result<Self, CliError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&contents)
            .map_err(|e| CliError::config(format!("{}: {}", path.display(), e)))
    }

    /// Database location: CLI override, then settings, then [`FALLBACK_DATABASE`].
    pub(crate) fn database(&self, cli_override: Option<String>) -> String {
        cli_override
            .or_else(|| self.defaults.database.clone())
            .unwrap_or_else(|| FALLBACK_DATABASE.to_string())
    }

    pub(crate) fn query_timeout(&self, cli_override: Option<u64>) -> Duration {
        cli_override
            .or(self.defaults.query_timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(sqlite_ingest_db::DEFAULT_QUERY_TIMEOUT)
    }

    pub(crate) fn transaction_set(&self, cli_override: Option<usize>) -> usize {
        cli_override
            .or(self.defaults.transaction_set)
            .unwrap_or(sqlite_ingest_import::DEFAULT_TRANSACTION_SET)
    }
}

/// Set one `[defaults]` key in the settings file at `path`.
///
/// Uses `toml::Value` for a surgical update so unrelated tables survive.
/// Numeric keys are validated and stored as integers.
pub(crate) fn save_default(path: &Path, key: &str, value: &str) -> Result<(), CliError> {
    let value = match key {
        "database" => toml::Value::String(value.to_string()),
        "query_timeout_secs" | "transaction_set" => {
            let n: i64 = value
                .parse()
                .ok()
                .filter(|n| *n >= 0)
                .ok_or_else(|| {
                    CliError::config(format!("'{}' needs a non-negative integer, got '{}'", key, value))
                })?;
            toml::Value::Integer(n)
        }
        other => {
            return Err(CliError::config(format!(
                "Unknown key '{}' (expected one of: {})",
                other,
                DEFAULT_KEYS.join(", ")
            )));
        }
    };

    let mut doc: toml::Value = match std::fs::read_to_string(path) {
        Ok(contents) => contents
            .parse()
            .map_err(|e| CliError::config(format!("{}: {}", path.display(), e)))?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => toml::Value::Table(Default::default()),
        Err(e) => return Err(e.into()),
    };

    let table = doc
        .as_table_mut()
        .ok_or_else(|| CliError::config("settings.toml root is not a table"))?;
    let defaults = table
        .entry("defaults")
        .or_insert_with(|| toml::Value::Table(Default::default()))
        .as_table_mut()
        .ok_or_else(|| CliError::config("[defaults] is not a table"))?;
    defaults.insert(key.to_string(), value);

    // Write atomically
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(&doc).map_err(|e| CliError::config(e.to_string()))?;
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
