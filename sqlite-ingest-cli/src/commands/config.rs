use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::settings::{Settings, save_default, settings_path};

/// Show the settings file and the defaults in effect.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = settings_path();

    log::info!(
        "{}",
        "sqlite-ingest Settings".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();

    let settings = Settings::load()?;
    let source = |set: bool| if set { "(settings)" } else { "(default)" };
    let lines = [
        (
            "database",
            settings.database(None),
            source(settings.defaults.database.is_some()),
        ),
        (
            "query_timeout_secs",
            settings.query_timeout(None).as_secs().to_string(),
            source(settings.defaults.query_timeout_secs.is_some()),
        ),
        (
            "transaction_set",
            settings.transaction_set(None).to_string(),
            source(settings.defaults.transaction_set.is_some()),
        ),
    ];
    for (name, value, source) in lines {
        log::info!(
            "  {} {} {}",
            format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
            value,
            source.if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() {
    log::info!("{}", settings_path().display());
}

/// Store one default in the settings file.
pub(crate) fn run_config_set(key: &str, value: &str) -> Result<(), CliError> {
    let path = settings_path();
    save_default(&path, key, value)?;
    log::info!(
        "{} Set {} = {} in {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        key.if_supports_color(Stdout, |t| t.cyan()),
        value,
        path.display(),
    );
    Ok(())
}
