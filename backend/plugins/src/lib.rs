pub mod loader;
pub mod options;
pub mod registry;

pub use loader::{apply_plugins, LoadReport, PluginFailure};
pub use options::{DeckOptions, PluginOption};
pub use registry::{Plugin, PluginRegistry};
