//! `bespoke-config`: deck configuration files.
//!
//! Provides:
//! - Typed config schema (document tree, decks, logging)
//! - YAML / JSON loading
//! - `${ENV_VAR}` substitution
//! - Structural validation

pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use env::{
    collect_referenced_vars, contains_env_var_reference, resolve_env_vars, resolve_env_vars_with,
    MissingEnvVarError,
};
pub use io::{load_config_value, parse_config_str, ConfigFormat};
pub use schema::{
    BespokeConfig, DeckSpec, ElementSpec, LoggingConfig, RepeatSpec, CURRENT_VERSION,
    DOCUMENT_ROOT_TAG,
};
pub use validation::{
    validate, validate_with_plugins, ConfigValidationError, ValidationReport,
};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::Path;
use tracing::warn;

/// Turn an untyped value tree into a config: substitute env vars, then
/// deserialize.
pub fn prepare(value: Value) -> Result<BespokeConfig> {
    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;
    serde_json::from_value(value).context("Config does not match the expected schema")
}

/// Load, substitute env vars, deserialize and validate a config file.
///
/// This is the main entry point for loading a config at runtime. Validation
/// warnings are logged; validation errors fail the load.
pub async fn load_and_prepare(path: &Path) -> Result<BespokeConfig> {
    let value = load_config_value(path).await?;
    let config = prepare(value)?;

    let report = validate(&config);
    for warning in &report.warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }
    if !report.is_valid() {
        let details: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        bail!("invalid config {}:\n  {}", path.display(), details.join("\n  "));
    }
    Ok(config)
}
