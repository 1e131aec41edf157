use anyhow::{Context, Result, anyhow};
use serde::de::DeserializeOwned;
use std::{fs, path::Path, path::PathBuf};

use super::types::{Cli, CleanArgs, Command, DEFAULT_BIND, FileConfig};
use crate::record::RecordConfig;

/// # Errors
///
/// Will return `Err` if the file is not readable
pub fn check_readable_file(file: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(file);
    if !path.is_file() || fs::metadata(&path).is_err() {
        return Err(format!("The file '{file}' is not readable."));
    }
    Ok(path)
}

/// # Errors
///
/// Will return `Err` if the file cannot be read or does not hold the expected json
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read json {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse json {}", path.display()))
}

/// Merge CLI values over the optional TOML file; CLI wins.
///
/// # Errors
///
/// Will return `Err` if the config file is unreadable or invalid, if no
/// database name is given, or if the record settings are out of range
pub fn load_config(cli: Cli) -> Result<CleanArgs> {
    let file_config = match cli.config_toml.as_ref() {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("read config toml {}", path.display()))?;
            toml::from_str::<FileConfig>(&contents)
                .with_context(|| format!("parse config toml {}", path.display()))?
        }
        None => FileConfig::default(),
    };

    let db_name = cli
        .db_name
        .or(file_config.db_name)
        .ok_or_else(|| anyhow!("missing --db-name"))?;

    let bind = match &cli.command {
        Command::Serve { bind: Some(bind) } => bind.clone(),
        _ => file_config.bind.unwrap_or_else(|| DEFAULT_BIND.to_string()),
    };

    let defaults = RecordConfig::default();
    let record = RecordConfig {
        limit: file_config.record_limit.unwrap_or(defaults.limit),
        lookback_years: file_config
            .record_lookback_years
            .unwrap_or(defaults.lookback_years),
    };
    if record.limit == 0 {
        return Err(anyhow!("record_limit must be at least 1"));
    }
    if record.lookback_years < 0 {
        return Err(anyhow!("record_lookback_years cannot be negative"));
    }

    Ok(CleanArgs {
        db_name,
        bind,
        record,
        command: cli.command,
    })
}
