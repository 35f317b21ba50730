//! Per-deck plugin options.
//!
//! Each entry maps a plugin name to one of three states: disabled, enabled
//! with an empty configuration, or enabled with a configuration value.
//! Conversion from JSON treats `false`, `null`, `0` and `""` as disabled,
//! objects and arrays as configurations, and any other value as enabled.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use bespoke_core::DeckError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum PluginOption {
    Disabled,
    Enabled,
    Configured(Value),
}

impl PluginOption {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null | Value::Bool(false) => Self::Disabled,
            Value::Number(n) if n.as_f64() == Some(0.0) => Self::Disabled,
            Value::String(s) if s.is_empty() => Self::Disabled,
            Value::Object(_) | Value::Array(_) => Self::Configured(value),
            _ => Self::Enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// The configuration handed to the plugin, or `None` when disabled.
    /// `Enabled` yields an empty object.
    pub fn config(&self) -> Option<Value> {
        match self {
            Self::Disabled => None,
            Self::Enabled => Some(Value::Object(Map::new())),
            Self::Configured(value) => Some(value.clone()),
        }
    }
}

impl From<Value> for PluginOption {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

impl From<bool> for PluginOption {
    fn from(enabled: bool) -> Self {
        if enabled { Self::Enabled } else { Self::Disabled }
    }
}

impl From<PluginOption> for Value {
    fn from(option: PluginOption) -> Self {
        match option {
            PluginOption::Disabled => Value::Bool(false),
            PluginOption::Enabled => Value::Bool(true),
            PluginOption::Configured(value) => value,
        }
    }
}

/// Plugin name -> option. Iteration is in name order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckOptions {
    entries: BTreeMap<String, PluginOption>,
}

impl DeckOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build options from a JSON object such as `{"keys": true, "hash": {...}}`.
    pub fn from_value(value: Value) -> Result<Self, DeckError> {
        match value {
            Value::Object(map) => Ok(map
                .into_iter()
                .map(|(name, v)| (name, PluginOption::from_value(v)))
                .collect()),
            Value::Null => Ok(Self::default()),
            other => Err(DeckError::InvalidOptions(format!(
                "expected an object of plugin options, got {other}"
            ))),
        }
    }

    pub fn set(mut self, name: impl Into<String>, option: impl Into<PluginOption>) -> Self {
        self.insert(name, option);
        self
    }

    pub fn enable(self, name: impl Into<String>) -> Self {
        self.set(name, PluginOption::Enabled)
    }

    pub fn disable(self, name: impl Into<String>) -> Self {
        self.set(name, PluginOption::Disabled)
    }

    pub fn configure(self, name: impl Into<String>, config: Value) -> Self {
        self.set(name, PluginOption::Configured(config))
    }

    pub fn insert(&mut self, name: impl Into<String>, option: impl Into<PluginOption>) {
        self.entries.insert(name.into(), option.into());
    }

    /// Enable `name` with an empty configuration unless an entry for it
    /// already exists. Returns `true` when an entry was added.
    pub fn enable_if_absent(&mut self, name: &str) -> bool {
        if self.entries.contains_key(name) {
            return false;
        }
        self.entries.insert(name.to_string(), PluginOption::Enabled);
        true
    }

    pub fn get(&self, name: &str) -> Option<&PluginOption> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PluginOption)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, PluginOption)> for DeckOptions {
    fn from_iter<I: IntoIterator<Item = (String, PluginOption)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

impl TryFrom<Value> for DeckOptions {
    type Error = DeckError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}
