//! Structured logging for Bespoke.
//!
//! Handles subscriber setup (console, JSON, rolling NDJSON files) and
//! structured deck-event records.

pub mod event_logger;
pub mod logger;

pub use event_logger::{DeckEventEntry, DeckEventLogger, EVENT_TARGET};
pub use logger::{init_logger, LoggerSettings, LOG_FILE_PREFIX};
