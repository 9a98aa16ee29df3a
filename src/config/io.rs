use super::models::ReaderConfig;
use super::tables::ConfigTables;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Load configuration from disk, falling back to defaults on any error.
pub fn load_config(path: &Path) -> ReaderConfig {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default config: {err}"
            );
            return ReaderConfig::default();
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            debug!(path = %path.display(), "Loaded reader config");
            config
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Invalid config, using defaults: {err:#}"
            );
            ReaderConfig::default()
        }
    }
}

pub fn parse_config(contents: &str) -> Result<ReaderConfig> {
    let tables: ConfigTables = toml::from_str(contents).context("parsing config TOML")?;
    Ok(ReaderConfig::from(tables).sanitized())
}

pub fn serialize_config(config: &ReaderConfig) -> Result<String> {
    toml::to_string_pretty(&ConfigTables::from(config)).context("serializing config TOML")
}
