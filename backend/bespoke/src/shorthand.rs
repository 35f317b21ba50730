use bespoke_core::{Deck, Result, SlideSelector};
use bespoke_plugins::{DeckOptions, LoadReport};
use tracing::{debug, warn};

use crate::container::Container;
use crate::registry::Bespoke;

/// A factory that bundles one plugin with every deck it builds.
///
/// The bundled plugin runs with `{}` unless `options` carries an entry of the
/// same name, in which case that entry is used as given (an explicit `false`
/// turns the bundled plugin off).
pub struct Shorthand<'a> {
    bespoke: &'a Bespoke,
    plugin: String,
}

impl<'a> Shorthand<'a> {
    pub(crate) fn new(bespoke: &'a Bespoke, plugin: impl Into<String>) -> Self {
        Self { bespoke, plugin: plugin.into() }
    }

    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    pub fn from(&self, container: impl Into<Container>, options: DeckOptions) -> Result<Deck> {
        self.from_selecting(container, SlideSelector::default(), options)
    }

    pub fn from_selecting(
        &self,
        container: impl Into<Container>,
        selector: SlideSelector,
        options: DeckOptions,
    ) -> Result<Deck> {
        self.from_selecting_with_report(container, selector, options)
            .map(|(deck, _report)| deck)
    }

    /// Like [`from`](Self::from) but also returns what the plugin loader did,
    /// including a bundled plugin that is not registered.
    pub fn from_with_report(
        &self,
        container: impl Into<Container>,
        options: DeckOptions,
    ) -> Result<(Deck, LoadReport)> {
        self.from_selecting_with_report(container, SlideSelector::default(), options)
    }

    pub fn from_selecting_with_report(
        &self,
        container: impl Into<Container>,
        selector: SlideSelector,
        mut options: DeckOptions,
    ) -> Result<(Deck, LoadReport)> {
        if !options.enable_if_absent(&self.plugin) {
            debug!(plugin = %self.plugin, "explicit option overrides shorthand default");
        }
        if !self.bespoke.plugins().contains(&self.plugin) {
            warn!(plugin = %self.plugin, "shorthand plugin is not registered");
        }
        self.bespoke.build(container.into(), &selector, &options)
    }
}
