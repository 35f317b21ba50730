//! Bespoke configuration schema.
//!
//! Describes a document tree and the decks to build over it, typed for serde
//! YAML/JSON deserialization.

use serde::{Deserialize, Serialize};

use bespoke_core::{Element, SlideSelector};
use bespoke_plugins::DeckOptions;

pub const CURRENT_VERSION: u32 = 1;

/// Tag of the synthetic root the configured document is mounted under.
pub const DOCUMENT_ROOT_TAG: &str = "body";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BespokeConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Top-level elements of the document, in order.
    #[serde(default)]
    pub document: Vec<ElementSpec>,

    #[serde(default)]
    pub decks: Vec<DeckSpec>,
}

impl Default for BespokeConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            logging: LoggingConfig::default(),
            document: Vec::new(),
            decks: Vec::new(),
        }
    }
}

impl BespokeConfig {
    /// Build the configured document under a fresh `body` root.
    pub fn build_document(&self) -> Element {
        let root = Element::new(DOCUMENT_ROOT_TAG);
        for spec in &self.document {
            root.append_child(spec.build());
        }
        root
    }
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `bespoke=debug`.
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines on the console instead of human-readable output.
    #[serde(default)]
    pub json: bool,

    /// Directory for daily-rolling NDJSON log files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_level(), json: false, dir: None }
    }
}

fn default_level() -> String {
    "info".to_string()
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSpec {
    pub tag: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementSpec>,

    /// Shorthand for `count` childless children with this tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<RepeatSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepeatSpec {
    pub tag: String,
    pub count: usize,
}

impl ElementSpec {
    pub fn build(&self) -> Element {
        let el = match &self.id {
            Some(id) => Element::with_id(&self.tag, id),
            None => Element::new(&self.tag),
        };
        for class in &self.classes {
            el.add_marker(class);
        }
        for child in &self.children {
            el.append_child(child.build());
        }
        if let Some(repeat) = &self.repeat {
            for _ in 0..repeat.count {
                el.append_child(Element::new(&repeat.tag));
            }
        }
        el
    }

    /// This element and all its descendants, depth-first.
    pub fn walk(&self) -> Vec<&ElementSpec> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Decks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSpec {
    /// Selector for the container: `tag`, `#id` or `.class`.
    pub container: String,

    /// Only direct children with this tag become slides. Default: every
    /// child except `script`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slides: Option<String>,

    /// Shorthand flavor whose plugin is bundled, e.g. `horizontal`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor: Option<String>,

    #[serde(default, skip_serializing_if = "DeckOptions::is_empty")]
    pub plugins: DeckOptions,
}

impl DeckSpec {
    pub fn slide_selector(&self) -> SlideSelector {
        match &self.slides {
            Some(tag) => SlideSelector::tag(tag),
            None => SlideSelector::Children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bespoke_plugins::PluginOption;

    const YAML: &str = r##"
logging:
  level: debug
document:
  - tag: article
    id: talk
    children:
      - tag: section
        classes: [intro]
      - tag: section
  - tag: article
    id: appendix
    repeat: { tag: section, count: 3 }
decks:
  - container: "#talk"
    slides: section
    flavor: horizontal
    plugins:
      keys: true
      touch: false
      hash: { prefix: "slide-" }
"##;

    #[test]
    fn parses_yaml() {
        let config: BespokeConfig = serde_yaml::from_str(YAML).unwrap();
        assert_eq!(config.version, CURRENT_VERSION);
        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.json);
        assert_eq!(config.document.len(), 2);

        let deck = &config.decks[0];
        assert_eq!(deck.slide_selector(), SlideSelector::tag("section"));
        assert_eq!(deck.flavor.as_deref(), Some("horizontal"));
        assert_eq!(deck.plugins.get("keys"), Some(&PluginOption::Enabled));
        assert_eq!(deck.plugins.get("touch"), Some(&PluginOption::Disabled));
        assert_eq!(
            deck.plugins.get("hash"),
            Some(&PluginOption::Configured(serde_json::json!({"prefix": "slide-"})))
        );
    }

    #[test]
    fn builds_the_document() {
        let config: BespokeConfig = serde_yaml::from_str(YAML).unwrap();
        let root = config.build_document();
        assert_eq!(root.tag(), DOCUMENT_ROOT_TAG);

        let talk = root.query_selector("#talk").unwrap();
        assert_eq!(talk.children().len(), 2);
        assert!(root.query_selector(".intro").is_some());

        let appendix = root.query_selector("#appendix").unwrap();
        assert_eq!(appendix.children().len(), 3);
    }

    #[test]
    fn defaults() {
        let config: BespokeConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.version, CURRENT_VERSION);
        assert_eq!(config.logging.level, "info");
        assert!(config.decks.is_empty());

        let deck: DeckSpec = serde_yaml::from_str("container: article").unwrap();
        assert_eq!(deck.slide_selector(), SlideSelector::Children);
        assert!(deck.plugins.is_empty());
    }

    #[test]
    fn walk_visits_descendants() {
        let config: BespokeConfig = serde_yaml::from_str(YAML).unwrap();
        let tags: Vec<_> = config.document[0].walk().iter().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["article", "section", "section"]);
    }
}
