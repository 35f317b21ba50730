pub mod deck;
pub mod dom;
pub mod emitter;
pub mod error;
pub mod event;
pub mod storage;

pub use deck::{Deck, SlideSelector};
pub use dom::Element;
pub use emitter::{Emitter, Listener};
pub use error::{DeckError, Result};
pub use event::{DeckEventKind, Marker, SlideEvent, ACTIVATE, DEACTIVATE};
pub use storage::PluginStorage;
