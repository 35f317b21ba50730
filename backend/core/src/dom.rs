//! Minimal in-memory element tree.
//!
//! Decks annotate elements through marker (class) lists. `Element` is a
//! cheap, thread-safe handle: clones refer to the same node and equality is
//! identity, the way DOM node references behave.

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub struct Element {
    inner: Arc<ElementInner>,
}

struct ElementInner {
    tag: String,
    id: Option<String>,
    markers: RwLock<Vec<String>>,
    children: RwLock<Vec<Element>>,
}

impl Element {
    /// Create a detached element. Tag names are stored lowercase.
    pub fn new(tag: impl Into<String>) -> Self {
        Self::build(tag.into(), None)
    }

    pub fn with_id(tag: impl Into<String>, id: impl Into<String>) -> Self {
        Self::build(tag.into(), Some(id.into()))
    }

    fn build(tag: String, id: Option<String>) -> Self {
        Self {
            inner: Arc::new(ElementInner {
                tag: tag.to_ascii_lowercase(),
                id,
                markers: RwLock::new(Vec::new()),
                children: RwLock::new(Vec::new()),
            }),
        }
    }

    pub fn tag(&self) -> &str {
        &self.inner.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.inner.id.as_deref()
    }

    /// Append `child` as the last child. Returns `self` for chaining.
    pub fn append_child(&self, child: Element) -> &Self {
        self.inner.children.write().push(child);
        self
    }

    /// Snapshot of the direct children in document order.
    pub fn children(&self) -> Vec<Element> {
        self.inner.children.read().clone()
    }

    // -----------------------------------------------------------------------
    // Markers
    // -----------------------------------------------------------------------

    /// Add a marker; adding one that is already present is a no-op.
    pub fn add_marker(&self, marker: &str) {
        let mut markers = self.inner.markers.write();
        if !markers.iter().any(|m| m == marker) {
            markers.push(marker.to_string());
        }
    }

    pub fn remove_marker(&self, marker: &str) {
        self.inner.markers.write().retain(|m| m != marker);
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.inner.markers.read().iter().any(|m| m == marker)
    }

    pub fn markers(&self) -> Vec<String> {
        self.inner.markers.read().clone()
    }

    /// Markers joined by spaces, like a DOM `className`.
    pub fn class_name(&self) -> String {
        self.inner.markers.read().join(" ")
    }

    // -----------------------------------------------------------------------
    // Selectors
    // -----------------------------------------------------------------------

    /// Whether this element matches a simple selector: `tag`, `#id` or `.marker`.
    pub fn matches(&self, selector: &str) -> bool {
        let selector = selector.trim();
        if let Some(id) = selector.strip_prefix('#') {
            self.id() == Some(id)
        } else if let Some(marker) = selector.strip_prefix('.') {
            self.has_marker(marker)
        } else {
            !selector.is_empty() && self.tag().eq_ignore_ascii_case(selector)
        }
    }

    /// First descendant (depth-first, document order) matching `selector`.
    /// The element itself is not considered.
    pub fn query_selector(&self, selector: &str) -> Option<Element> {
        for child in self.children() {
            if child.matches(selector) {
                return Some(child);
            }
            if let Some(found) = child.query_selector(selector) {
                return Some(found);
            }
        }
        None
    }

    /// This element if it matches `selector`, else its first matching
    /// descendant. Containers are located this way.
    pub fn locate(&self, selector: &str) -> Option<Element> {
        if self.matches(selector) {
            return Some(self.clone());
        }
        self.query_selector(selector)
    }

    /// All descendants matching `selector`, in document order.
    pub fn query_selector_all(&self, selector: &str) -> Vec<Element> {
        let mut out = Vec::new();
        self.collect_matching(selector, &mut out);
        out
    }

    fn collect_matching(&self, selector: &str, out: &mut Vec<Element>) {
        for child in self.children() {
            if child.matches(selector) {
                out.push(child.clone());
            }
            child.collect_matching(selector, out);
        }
    }

    pub fn ptr_eq(&self, other: &Element) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Element");
        s.field("tag", &self.inner.tag);
        if let Some(id) = &self.inner.id {
            s.field("id", id);
        }
        s.field("markers", &*self.inner.markers.read()).finish()
    }
}
