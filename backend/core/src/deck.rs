//! Deck state machine.
//!
//! A deck owns the slides found under one container and the index of the
//! active slide. Every transition recomputes the markers on all slides and
//! schedules `deactivate` / `activate` on the deck's emitter.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::dom::Element;
use crate::emitter::Emitter;
use crate::event::{Marker, SlideEvent, ACTIVATE, DEACTIVATE};
use crate::storage::PluginStorage;

static NEXT_DECK_ID: AtomicU64 = AtomicU64::new(1);

/// Which direct children of the container become slides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SlideSelector {
    /// Every direct child except `script` elements.
    #[default]
    Children,
    /// Direct children with this tag name (case-insensitive).
    Tag(String),
}

impl SlideSelector {
    pub fn tag(name: impl Into<String>) -> Self {
        Self::Tag(name.into())
    }

    pub fn select(&self, parent: &Element) -> Vec<Element> {
        parent
            .children()
            .into_iter()
            .filter(|child| match self {
                Self::Children => !child.tag().eq_ignore_ascii_case("script"),
                Self::Tag(tag) => child.tag().eq_ignore_ascii_case(tag),
            })
            .collect()
    }
}

/// Shared handle to one deck. Clones refer to the same deck.
#[derive(Clone)]
pub struct Deck {
    inner: Arc<DeckInner>,
}

struct DeckInner {
    id: u64,
    parent: Element,
    slides: Vec<Element>,
    active: Mutex<usize>,
    events: Emitter<SlideEvent>,
    storage: PluginStorage,
}

impl Deck {
    /// Build a deck over the children of `parent` picked by `selector`.
    /// Slide 0 starts active.
    pub fn new(parent: Element, selector: &SlideSelector) -> Self {
        let slides = selector.select(&parent);

        parent.add_marker(Marker::Parent.as_str());
        for slide in &slides {
            slide.add_marker(Marker::Slide.as_str());
        }

        let deck = Self {
            inner: Arc::new(DeckInner {
                id: NEXT_DECK_ID.fetch_add(1, Ordering::Relaxed),
                parent,
                slides,
                active: Mutex::new(0),
                events: Emitter::new(),
                storage: PluginStorage::new(),
            }),
        };
        deck.annotate(0);
        debug!(deck = deck.id(), slides = deck.len(), "deck created");
        deck
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn parent(&self) -> &Element {
        &self.inner.parent
    }

    pub fn slides(&self) -> &[Element] {
        &self.inner.slides
    }

    pub fn slide_at(&self, index: usize) -> Option<&Element> {
        self.inner.slides.get(index)
    }

    pub fn len(&self) -> usize {
        self.inner.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.slides.is_empty()
    }

    pub fn active_index(&self) -> usize {
        *self.inner.active.lock()
    }

    pub fn active_slide(&self) -> Option<&Element> {
        self.slide_at(self.active_index())
    }

    pub fn storage(&self) -> &PluginStorage {
        &self.inner.storage
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Activate the slide at `index`.
    ///
    /// Out-of-range or already-active indices are ignored. Returns whether a
    /// transition happened.
    pub fn slide(&self, index: usize) -> bool {
        let mut active = self.inner.active.lock();
        self.transition(&mut active, index)
    }

    pub fn next(&self) -> bool {
        let mut active = self.inner.active.lock();
        let index = active.saturating_add(1);
        self.transition(&mut active, index)
    }

    pub fn prev(&self) -> bool {
        let mut active = self.inner.active.lock();
        match active.checked_sub(1) {
            Some(index) => self.transition(&mut active, index),
            None => false,
        }
    }

    /// Runs with the state lock held so that concurrent navigation is
    /// serialized and events are queued in transition order. Queuing only
    /// enqueues; listeners run later on the emitter's delivery task.
    fn transition(&self, active: &mut usize, index: usize) -> bool {
        let previous = *active;
        if index >= self.len() || index == previous {
            trace!(deck = self.id(), index, "navigation ignored");
            return false;
        }

        self.annotate(index);
        *active = index;

        debug!(deck = self.id(), from = previous, to = index, "slide transition");
        let slides = &self.inner.slides;
        self.inner
            .events
            .fire(DEACTIVATE, SlideEvent::new(slides[previous].clone(), previous));
        self.inner
            .events
            .fire(ACTIVATE, SlideEvent::new(slides[index].clone(), index));
        true
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    pub fn on<F>(&self, event: impl Into<String>, listener: F) -> &Self
    where
        F: Fn(&SlideEvent) + Send + Sync + 'static,
    {
        self.inner.events.on(event, listener);
        self
    }

    /// Fire a named event on this deck's emitter. Plugins use this for their
    /// own events; delivery is deferred like the built-in ones.
    pub fn fire(&self, event: &str, payload: SlideEvent) -> bool {
        self.inner.events.fire(event, payload)
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.inner.events.listener_count(event)
    }

    fn annotate(&self, active: usize) {
        for (i, slide) in self.inner.slides.iter().enumerate() {
            if i == active {
                slide.add_marker(Marker::Active.as_str());
                slide.remove_marker(Marker::Inactive.as_str());
            } else {
                slide.add_marker(Marker::Inactive.as_str());
                slide.remove_marker(Marker::Active.as_str());
            }

            if i < active {
                slide.add_marker(Marker::Before.as_str());
                slide.remove_marker(Marker::After.as_str());
            } else if i > active {
                slide.add_marker(Marker::After.as_str());
                slide.remove_marker(Marker::Before.as_str());
            } else {
                slide.remove_marker(Marker::Before.as_str());
                slide.remove_marker(Marker::After.as_str());
            }
        }
    }
}

impl PartialEq for Deck {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Deck {}

impl std::fmt::Debug for Deck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deck")
            .field("id", &self.inner.id)
            .field("slides", &self.len())
            .field("active", &self.active_index())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    const NO_OF_SLIDES: usize = 10;

    fn article() -> (Element, Vec<Element>) {
        let article = Element::new("article");
        let slides: Vec<_> = (0..NO_OF_SLIDES).map(|_| Element::new("section")).collect();
        for slide in &slides {
            article.append_child(slide.clone());
        }
        (article, slides)
    }

    fn deck() -> (Deck, Vec<Element>) {
        let (article, slides) = article();
        (Deck::new(article, &SlideSelector::Children), slides)
    }

    fn has(el: &Element, marker: Marker) -> bool {
        el.has_marker(marker.as_str())
    }

    fn active_count(slides: &[Element]) -> usize {
        slides.iter().filter(|s| has(s, Marker::Active)).count()
    }

    async fn recv(rx: &mut mpsc::UnboundedReceiver<SlideEvent>) -> SlideEvent {
        timeout(Duration::from_millis(200), rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("channel closed")
    }

    fn forward(deck: &Deck, event: &str) -> mpsc::UnboundedReceiver<SlideEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        deck.on(event, move |ev| {
            let _ = tx.send(ev.clone());
        });
        rx
    }

    #[test]
    fn construction_marks_parent_and_slides() {
        let (deck, slides) = deck();
        assert!(has(deck.parent(), Marker::Parent));
        assert_eq!(deck.slides(), &slides[..]);
        assert_eq!(deck.active_index(), 0);
        for slide in &slides {
            assert!(has(slide, Marker::Slide));
            assert!(!has(slide, Marker::Before));
        }
        assert!(has(&slides[0], Marker::Active));
        assert!(!has(&slides[0], Marker::Inactive));
        assert!(!has(&slides[0], Marker::After));
        for slide in &slides[1..] {
            assert!(has(slide, Marker::Inactive));
            assert!(!has(slide, Marker::Active));
        }
    }

    #[test]
    fn selector_filters_children() {
        let parent = Element::new("article");
        let a = Element::new("section");
        let script = Element::new("script");
        let b = Element::new("div");
        parent
            .append_child(a.clone())
            .append_child(script.clone())
            .append_child(b.clone());

        assert_eq!(SlideSelector::Children.select(&parent), vec![a.clone(), b]);
        assert_eq!(SlideSelector::tag("SECTION").select(&parent), vec![a]);

        let deck = Deck::new(parent, &SlideSelector::Children);
        assert!(!has(&script, Marker::Slide));
        assert_eq!(deck.len(), 2);
    }

    #[test]
    fn slide_five_of_ten() {
        let (deck, slides) = deck();
        assert!(deck.slide(5));
        for slide in &slides[0..5] {
            assert!(has(slide, Marker::Before));
            assert!(!has(slide, Marker::After));
            assert!(!has(slide, Marker::Active));
            assert!(has(slide, Marker::Inactive));
        }
        assert!(has(&slides[5], Marker::Active));
        assert!(!has(&slides[5], Marker::Before));
        assert!(!has(&slides[5], Marker::After));
        for slide in &slides[6..] {
            assert!(has(slide, Marker::After));
            assert!(!has(slide, Marker::Before));
        }
        assert_eq!(active_count(&slides), 1);
    }

    #[test]
    fn exactly_one_active_through_navigation() {
        let (deck, slides) = deck();
        for step in [3usize, 9, 0, 4, 4, 12] {
            deck.slide(step);
            assert_eq!(active_count(&slides), 1);
        }
        deck.next();
        deck.prev();
        deck.prev();
        assert_eq!(active_count(&slides), 1);
        for slide in &slides {
            assert!(has(slide, Marker::Slide));
        }
    }

    #[test]
    fn ignored_requests_change_nothing() {
        let (deck, slides) = deck();
        deck.slide(2);
        let before: Vec<_> = slides.iter().map(Element::class_name).collect();
        assert!(!deck.slide(2));
        assert!(!deck.slide(NO_OF_SLIDES));
        assert!(!deck.slide(usize::MAX));
        let after: Vec<_> = slides.iter().map(Element::class_name).collect();
        assert_eq!(before, after);
        assert_eq!(deck.active_index(), 2);
    }

    #[test]
    fn next_stops_at_last_slide() {
        let (deck, slides) = deck();
        deck.slide(9);
        assert!(!deck.next());
        assert!(!deck.next());
        assert_eq!(deck.active_index(), 9);
        deck.prev();
        assert!(has(&slides[8], Marker::Active));
    }

    #[test]
    fn prev_stops_at_first_slide() {
        let (deck, slides) = deck();
        assert!(!deck.prev());
        assert!(!deck.prev());
        assert!(deck.next());
        assert_eq!(deck.active_index(), 1);
        assert!(has(&slides[1], Marker::Active));
    }

    #[test]
    fn empty_deck_ignores_navigation() {
        let deck = Deck::new(Element::new("article"), &SlideSelector::Children);
        assert!(deck.is_empty());
        assert!(deck.active_slide().is_none());
        assert!(!deck.next());
        assert!(!deck.prev());
        assert!(!deck.slide(0));
    }

    #[tokio::test]
    async fn activate_is_deferred_and_carries_payload() {
        let (deck, slides) = deck();
        let mut rx = forward(&deck, ACTIVATE);
        deck.next();
        assert!(rx.try_recv().is_err());

        let ev = recv(&mut rx).await;
        assert_eq!(ev, SlideEvent::new(slides[1].clone(), 1));
        assert!(timeout(Duration::from_millis(30), rx.recv()).await.is_err());
    }

    #[tokio::test]
    async fn deactivate_fires_once_with_previous_slide() {
        let (deck, slides) = deck();
        let mut rx = forward(&deck, DEACTIVATE);
        deck.slide(1);

        let ev = recv(&mut rx).await;
        assert_eq!(ev, SlideEvent::new(slides[0].clone(), 0));
        assert!(timeout(Duration::from_millis(30), rx.recv()).await.is_err());
    }

    #[tokio::test]
    async fn ignored_requests_fire_nothing() {
        let (deck, _) = deck();
        let mut activated = forward(&deck, ACTIVATE);
        let mut deactivated = forward(&deck, DEACTIVATE);
        deck.slide(0);
        deck.prev();
        deck.slide(42);
        assert!(timeout(Duration::from_millis(30), activated.recv()).await.is_err());
        assert!(deactivated.try_recv().is_err());
    }

    #[tokio::test]
    async fn custom_events_share_the_emitter() {
        let (deck, slides) = deck();
        let mut rx = forward(&deck, "overview");
        assert_eq!(deck.listener_count("overview"), 1);
        assert!(deck.fire("overview", SlideEvent::new(slides[3].clone(), 3)));
        assert_eq!(recv(&mut rx).await.index, 3);
    }

    #[test]
    fn concurrent_next_loses_no_steps() {
        let article = Element::new("article");
        for _ in 0..100 {
            article.append_child(Element::new("section"));
        }
        let deck = Deck::new(article, &SlideSelector::Children);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..10 {
                        assert!(deck.next());
                    }
                });
            }
        });
        assert_eq!(deck.active_index(), 80);
        assert_eq!(active_count(deck.slides()), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn transitions_are_delivered_in_order() {
        let article = Element::new("article");
        for _ in 0..50 {
            article.append_child(Element::new("section"));
        }
        let deck = Deck::new(article, &SlideSelector::Children);
        let (tx, mut rx) = mpsc::unbounded_channel();
        for kind in [DEACTIVATE, ACTIVATE] {
            let tx = tx.clone();
            deck.on(kind, move |ev| {
                let _ = tx.send((kind, ev.index));
            });
        }

        for index in 1..50 {
            deck.slide(index);
        }
        for index in 1..50 {
            let first = timeout(Duration::from_millis(500), rx.recv()).await.unwrap();
            let second = timeout(Duration::from_millis(500), rx.recv()).await.unwrap();
            assert_eq!(first, Some((DEACTIVATE, index - 1)));
            assert_eq!(second, Some((ACTIVATE, index)));
        }
        assert_eq!(deck.active_index(), 49);
    }

    #[test]
    fn clones_share_state_and_storage() {
        let (deck, _) = deck();
        let other = deck.clone();
        other.slide(4);
        other.storage().insert("hash", 4usize);
        assert_eq!(deck.active_index(), 4);
        assert_eq!(deck.storage().get::<usize>("hash"), Some(4));
        assert_eq!(deck, other);
        assert_ne!(deck.id(), Deck::new(Element::new("article"), &SlideSelector::Children).id());
    }
}
