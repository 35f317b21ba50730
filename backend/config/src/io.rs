//! Config file reading.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// File formats a config can be written in, picked by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase) {
            Some(ext) if ext == "yaml" || ext == "yml" => Ok(Self::Yaml),
            Some(ext) if ext == "json" => Ok(Self::Json),
            _ => bail!(
                "unsupported config file extension: {} (expected .yaml, .yml or .json)",
                path.display()
            ),
        }
    }
}

/// Parse raw config text into an untyped value tree.
pub fn parse_config_str(raw: &str, format: ConfigFormat) -> Result<Value> {
    let value = match format {
        ConfigFormat::Yaml => {
            serde_yaml::from_str::<Value>(raw).context("Failed to parse config YAML")?
        }
        ConfigFormat::Json => {
            serde_json::from_str::<Value>(raw).context("Failed to parse config JSON")?
        }
    };
    // An empty YAML document parses as null.
    Ok(if value.is_null() { Value::Object(Default::default()) } else { value })
}

/// Read a config file into an untyped value tree.
pub async fn load_config_value(path: &Path) -> Result<Value> {
    let format = ConfigFormat::from_path(path)?;
    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    debug!(path = %path.display(), ?format, bytes = raw.len(), "read config file");

    let value = parse_config_str(&raw, format)
        .with_context(|| format!("Invalid config at: {}", path.display()))?;
    info!(path = %path.display(), "Loaded config");
    Ok(value)
}
