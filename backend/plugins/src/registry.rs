//! Plugin trait and name-keyed registry.
//!
//! A plugin is applied once to each freshly built deck whose options enable
//! it. It receives the deck and its configuration (`{}` when enabled with
//! `true`) and typically registers listeners or seeds private storage.

use anyhow::Result;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use bespoke_core::Deck;

// ---------------------------------------------------------------------------
// Plugin trait
// ---------------------------------------------------------------------------

pub trait Plugin: Send + Sync {
    fn apply(&self, deck: &Deck, config: &Value) -> Result<()>;
}

impl<F> Plugin for F
where
    F: Fn(&Deck, &Value) -> Result<()> + Send + Sync,
{
    fn apply(&self, deck: &Deck, config: &Value) -> Result<()> {
        self(deck, config)
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

type PluginBox = Arc<dyn Plugin>;

/// Shared, thread-safe map of plugin name to plugin. Clones share state.
#[derive(Default, Clone)]
pub struct PluginRegistry {
    plugins: Arc<RwLock<HashMap<String, PluginBox>>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a closure under `name`, replacing any previous plugin.
    pub fn register<F>(&self, name: impl Into<String>, plugin: F) -> &Self
    where
        F: Fn(&Deck, &Value) -> Result<()> + Send + Sync + 'static,
    {
        self.register_plugin(name, Arc::new(plugin))
    }

    pub fn register_plugin(&self, name: impl Into<String>, plugin: Arc<dyn Plugin>) -> &Self {
        let name = name.into();
        if self.plugins.write().insert(name.clone(), plugin).is_some() {
            debug!(plugin = %name, "replaced registered plugin");
        } else {
            debug!(plugin = %name, "registered plugin");
        }
        self
    }

    pub fn unregister(&self, name: &str) -> bool {
        self.plugins.write().remove(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        self.plugins.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plugins.read().contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.plugins.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry").field("plugins", &self.names()).finish()
    }
}
