use serde::{Deserialize, Serialize};

use crate::dom::Element;

/// Payload delivered with `activate` / `deactivate` events.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideEvent {
    pub slide: Element,
    pub index: usize,
}

impl SlideEvent {
    pub fn new(slide: Element, index: usize) -> Self {
        Self { slide, index }
    }
}

/// Lifecycle events fired by every deck.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DeckEventKind {
    /// A slide became the active one
    Activate,
    /// The previously active slide lost that role
    Deactivate,
}

impl DeckEventKind {
    pub const ALL: [DeckEventKind; 2] = [DeckEventKind::Activate, DeckEventKind::Deactivate];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Activate => "activate",
            Self::Deactivate => "deactivate",
        }
    }
}

impl std::fmt::Display for DeckEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const ACTIVATE: &str = "activate";
pub const DEACTIVATE: &str = "deactivate";

/// Style hooks applied to deck elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    Parent,
    Slide,
    Active,
    Inactive,
    Before,
    After,
}

impl Marker {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Parent => "bespoke-parent",
            Self::Slide => "bespoke-slide",
            Self::Active => "bespoke-active",
            Self::Inactive => "bespoke-inactive",
            Self::Before => "bespoke-before",
            Self::After => "bespoke-after",
        }
    }
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
