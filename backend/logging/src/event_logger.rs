//! Deck Event Logger
//!
//! Turns registry-wide `activate` / `deactivate` events into structured
//! records under the `deck_events` target.

use bespoke::{Bespoke, DeckEventKind, SlideEvent};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

pub const EVENT_TARGET: &str = "deck_events";

#[derive(Debug, Clone, Serialize)]
pub struct DeckEventEntry {
    pub kind: DeckEventKind,
    pub index: usize,
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl DeckEventEntry {
    pub fn new(kind: DeckEventKind, event: &SlideEvent) -> Self {
        Self {
            kind,
            index: event.index,
            tag: event.slide.tag().to_string(),
            id: event.slide.id().map(str::to_string),
            timestamp: Utc::now(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

pub struct DeckEventLogger;

impl DeckEventLogger {
    /// Log every deck event the registry relays from now on.
    pub fn attach(bespoke: &Bespoke) {
        for kind in DeckEventKind::ALL {
            bespoke.on(kind.as_str(), move |ev| Self::log_event(kind, ev));
        }
    }

    pub fn log_event(kind: DeckEventKind, event: &SlideEvent) {
        let entry = DeckEventEntry::new(kind, event);
        match entry.to_json() {
            Ok(json) => info!(
                target: EVENT_TARGET,
                kind = %entry.kind,
                index = entry.index,
                entry = %json,
                "deck event"
            ),
            Err(e) => warn!(
                target: EVENT_TARGET,
                kind = %entry.kind,
                index = entry.index,
                error = %e,
                "deck event could not be serialized"
            ),
        }
    }
}
