//! Deck registry and factory.
//!
//! A `Bespoke` owns every deck built through it, the plugin registry those
//! decks are configured from, and a registry-wide emitter that re-fires each
//! deck's `activate` / `deactivate` events.

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

use bespoke_core::{Deck, DeckEventKind, Element, Emitter, Result, SlideEvent, SlideSelector};
use bespoke_plugins::{apply_plugins, DeckOptions, LoadReport, PluginRegistry};

use crate::container::Container;
use crate::shorthand::Shorthand;

/// Plugin bundled by [`Bespoke::horizontal`].
pub const HORIZONTAL: &str = "horizontal";
/// Plugin bundled by [`Bespoke::vertical`].
pub const VERTICAL: &str = "vertical";

/// Thread-safe deck registry. Clones share state.
#[derive(Clone, Default)]
pub struct Bespoke {
    inner: Arc<BespokeInner>,
}

#[derive(Default)]
struct BespokeInner {
    decks: RwLock<Vec<Deck>>,
    plugins: PluginRegistry,
    events: Arc<Emitter<SlideEvent>>,
    document: RwLock<Option<Element>>,
}

impl Bespoke {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry whose selectors resolve against `document`.
    pub fn with_document(document: Element) -> Self {
        let bespoke = Self::new();
        bespoke.set_document(document);
        bespoke
    }

    pub fn set_document(&self, document: Element) {
        *self.inner.document.write() = Some(document);
    }

    pub fn document(&self) -> Option<Element> {
        self.inner.document.read().clone()
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.inner.plugins
    }

    /// Snapshot of every deck built so far, in creation order.
    pub fn decks(&self) -> Vec<Deck> {
        self.inner.decks.read().clone()
    }

    // -----------------------------------------------------------------------
    // Factory
    // -----------------------------------------------------------------------

    /// Build a deck from every direct child of `container` and apply the
    /// plugins enabled in `options`.
    pub fn from(&self, container: impl Into<Container>, options: DeckOptions) -> Result<Deck> {
        self.from_selecting(container, SlideSelector::default(), options)
    }

    pub fn from_selecting(
        &self,
        container: impl Into<Container>,
        selector: SlideSelector,
        options: DeckOptions,
    ) -> Result<Deck> {
        self.build(container.into(), &selector, &options)
            .map(|(deck, _report)| deck)
    }

    /// Like [`from`](Self::from) but also returns what the plugin loader did.
    pub fn from_with_report(
        &self,
        container: impl Into<Container>,
        options: DeckOptions,
    ) -> Result<(Deck, LoadReport)> {
        self.build(container.into(), &SlideSelector::default(), &options)
    }

    pub fn from_selecting_with_report(
        &self,
        container: impl Into<Container>,
        selector: SlideSelector,
        options: DeckOptions,
    ) -> Result<(Deck, LoadReport)> {
        self.build(container.into(), &selector, &options)
    }

    pub(crate) fn build(
        &self,
        container: Container,
        selector: &SlideSelector,
        options: &DeckOptions,
    ) -> Result<(Deck, LoadReport)> {
        let parent = container.resolve(self.document().as_ref())?;
        let deck = Deck::new(parent, selector);

        for kind in DeckEventKind::ALL {
            let relay = Arc::clone(&self.inner.events);
            deck.on(kind.as_str(), move |ev| {
                relay.fire(kind.as_str(), ev.clone());
            });
        }

        let report = apply_plugins(&deck, options, &self.inner.plugins);
        if !report.failed.is_empty() {
            warn!(
                deck = deck.id(),
                failed = report.failed.len(),
                "deck built with failing plugins"
            );
        }

        self.inner.decks.write().push(deck.clone());
        info!(
            deck = deck.id(),
            slides = deck.len(),
            plugins = report.applied.len(),
            "deck registered"
        );
        Ok((deck, report))
    }

    /// Factory that always bundles the plugin `name`.
    pub fn shorthand(&self, name: impl Into<String>) -> Shorthand<'_> {
        Shorthand::new(self, name)
    }

    pub fn horizontal(&self) -> Shorthand<'_> {
        self.shorthand(HORIZONTAL)
    }

    pub fn vertical(&self) -> Shorthand<'_> {
        self.shorthand(VERTICAL)
    }

    // -----------------------------------------------------------------------
    // Broadcast navigation
    // -----------------------------------------------------------------------

    /// Advance every deck. Returns how many decks moved.
    pub fn next(&self) -> usize {
        self.broadcast("next", Deck::next)
    }

    pub fn prev(&self) -> usize {
        self.broadcast("prev", Deck::prev)
    }

    pub fn slide(&self, index: usize) -> usize {
        self.broadcast("slide", |deck| deck.slide(index))
    }

    fn broadcast(&self, op: &str, f: impl Fn(&Deck) -> bool) -> usize {
        let decks = self.decks();
        let moved = decks.iter().filter(|deck| f(*deck)).count();
        debug!(op, decks = decks.len(), moved, "broadcast navigation");
        moved
    }

    // -----------------------------------------------------------------------
    // Registry-wide events
    // -----------------------------------------------------------------------

    pub fn on<F>(&self, event: impl Into<String>, listener: F) -> &Self
    where
        F: Fn(&SlideEvent) + Send + Sync + 'static,
    {
        self.inner.events.on(event, listener);
        self
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.inner.events.listener_count(event)
    }
}

impl std::fmt::Debug for Bespoke {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bespoke")
            .field("decks", &self.inner.decks.read().len())
            .field("plugins", &self.inner.plugins)
            .finish()
    }
}
