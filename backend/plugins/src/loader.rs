//! Plugin Loader
//!
//! Applies the plugins enabled in a deck's options to a freshly built deck.
//! A plugin that errors or panics is logged and recorded; the remaining
//! plugins still run.

use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, warn};

use bespoke_core::emitter::panic_message;
use bespoke_core::Deck;

use crate::options::DeckOptions;
use crate::registry::PluginRegistry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginFailure {
    pub plugin: String,
    pub error: String,
}

/// What happened to each entry of the options during one load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub applied: Vec<String>,
    pub disabled: Vec<String>,
    /// Enabled in the options but not registered.
    pub missing: Vec<String>,
    pub failed: Vec<PluginFailure>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.missing.is_empty()
    }
}

/// Apply every plugin enabled in `options` that `registry` knows about.
pub fn apply_plugins(deck: &Deck, options: &DeckOptions, registry: &PluginRegistry) -> LoadReport {
    let mut report = LoadReport::default();

    for (name, option) in options.iter() {
        let Some(config) = option.config() else {
            debug!(deck = deck.id(), plugin = %name, "plugin disabled");
            report.disabled.push(name.to_string());
            continue;
        };
        let Some(plugin) = registry.get(name) else {
            debug!(deck = deck.id(), plugin = %name, "no plugin registered under this name");
            report.missing.push(name.to_string());
            continue;
        };

        let outcome = catch_unwind(AssertUnwindSafe(|| plugin.apply(deck, &config)));
        let error = match outcome {
            Ok(Ok(())) => {
                debug!(deck = deck.id(), plugin = %name, "plugin applied");
                report.applied.push(name.to_string());
                continue;
            }
            Ok(Err(e)) => format!("{e:#}"),
            Err(panic) => panic_message(&*panic),
        };
        warn!(deck = deck.id(), plugin = %name, error = %error, "plugin failed");
        report.failed.push(PluginFailure { plugin: name.to_string(), error });
    }

    report
}
