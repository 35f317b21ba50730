//! `bespoke`: slide deck engine.
//!
//! Provides:
//! - [`Bespoke`], an injectable registry of decks, plugins and registry-wide events
//! - shorthand factories that bundle a navigation plugin ([`HORIZONTAL`], [`VERTICAL`])
//! - a lazily created process-wide registry with free-function access
//!
//! ```ignore
//! let deck = bespoke::global()
//!     .horizontal()
//!     .from(article, DeckOptions::new().enable("keys"))?;
//! deck.on(bespoke::ACTIVATE, |ev| println!("now on slide {}", ev.index));
//! bespoke::next();
//! ```

pub mod container;
pub mod registry;
pub mod shorthand;

pub use bespoke_core::{
    Deck, DeckError, DeckEventKind, Element, Marker, PluginStorage, Result, SlideEvent,
    SlideSelector, ACTIVATE, DEACTIVATE,
};
pub use bespoke_plugins::{DeckOptions, LoadReport, Plugin, PluginOption, PluginRegistry};
pub use container::Container;
pub use registry::{Bespoke, HORIZONTAL, VERTICAL};
pub use shorthand::Shorthand;

use once_cell::sync::Lazy;

static GLOBAL: Lazy<Bespoke> = Lazy::new(Bespoke::new);

/// The process-wide registry. Created on first use and never torn down.
pub fn global() -> &'static Bespoke {
    &GLOBAL
}

pub fn from(container: impl Into<Container>, options: DeckOptions) -> Result<Deck> {
    global().from(container, options)
}

pub fn horizontal() -> Shorthand<'static> {
    global().horizontal()
}

pub fn vertical() -> Shorthand<'static> {
    global().vertical()
}

pub fn decks() -> Vec<Deck> {
    global().decks()
}

pub fn plugins() -> &'static PluginRegistry {
    global().plugins()
}

pub fn next() -> usize {
    global().next()
}

pub fn prev() -> usize {
    global().prev()
}

pub fn slide(index: usize) -> usize {
    global().slide(index)
}

pub fn on<F>(event: impl Into<String>, listener: F) -> &'static Bespoke
where
    F: Fn(&SlideEvent) + Send + Sync + 'static,
{
    global().on(event, listener)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    fn article(slides: usize) -> Element {
        let article = Element::new("article");
        for _ in 0..slides {
            article.append_child(Element::new("section"));
        }
        article
    }

    // The global registry is shared by every test in this binary, so these
    // tests only assert on decks they created themselves and never broadcast.

    #[test]
    fn global_factory_registers_decks() {
        let deck = from(article(4), DeckOptions::new()).unwrap();
        assert!(decks().contains(&deck));
        assert!(std::ptr::eq(global(), global()));
    }

    #[tokio::test]
    async fn global_events_relay_activations() {
        let slides = article(3);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let target = slides.clone();
        on(ACTIVATE, move |ev| {
            if ev.index == 2 && target.children().contains(&ev.slide) {
                let _ = tx.send(ev.index);
            }
        });
        let deck = from(&slides, DeckOptions::new()).unwrap();
        deck.slide(2);

        let got = timeout(Duration::from_millis(200), rx.recv()).await.unwrap();
        assert_eq!(got, Some(2));
    }
}
