use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};

use scan_core::ScanConfiguration;

pub fn default_data_dir() -> PathBuf {
    dirs_next::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("clothing-scan")
}

/// Load configuration from an optional TOML file. No file means defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<ScanConfiguration> {
    let config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            parse_config(&text).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => ScanConfiguration::default(),
    };
    config.validate().map_err(|e| anyhow!(e))?;
    log::debug!("Using configuration {:?}", config);
    Ok(config)
}

fn parse_config(text: &str) -> anyhow::Result<ScanConfiguration> {
    Ok(toml::from_str(text)?)
}
