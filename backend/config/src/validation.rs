//! Config validation: structural checks with user-friendly messages.

use std::collections::HashSet;
use thiserror::Error;

use bespoke_core::Element;
use bespoke_plugins::PluginRegistry;

use crate::schema::{BespokeConfig, CURRENT_VERSION};

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// A validation finding with field path and message.
#[derive(Debug, Error)]
#[error("config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError { path: path.into(), message: message.into() });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError { path: path.into(), message: message.into() });
    }
}

/// Validate the config and return every error and warning found.
pub fn validate(config: &BespokeConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_version(config, &mut report);
    validate_logging(config, &mut report);
    validate_document(config, &mut report);
    validate_decks(config, &mut report);
    report
}

/// [`validate`], plus a warning for every flavor or enabled plugin that
/// `registry` cannot resolve. Such entries are skipped when the deck is built.
pub fn validate_with_plugins(
    config: &BespokeConfig,
    registry: &PluginRegistry,
) -> ValidationReport {
    let mut report = validate(config);
    for (i, deck) in config.decks.iter().enumerate() {
        if let Some(flavor) = deck.flavor.as_deref().filter(|f| !f.trim().is_empty()) {
            let disabled = deck.plugins.get(flavor).is_some_and(|o| !o.is_enabled());
            if !disabled && !registry.contains(flavor) {
                report.warn(
                    format!("decks[{i}].flavor"),
                    format!("no plugin named '{flavor}' is registered"),
                );
            }
        }
        for (name, option) in deck.plugins.iter() {
            if option.is_enabled() && !registry.contains(name) {
                report.warn(
                    format!("decks[{i}].plugins.{name}"),
                    format!("no plugin named '{name}' is registered"),
                );
            }
        }
    }
    report
}

fn validate_version(config: &BespokeConfig, report: &mut ValidationReport) {
    if config.version == 0 || config.version > CURRENT_VERSION {
        report.error(
            "version",
            format!("unsupported version {}; expected {CURRENT_VERSION}", config.version),
        );
    }
}

fn validate_logging(config: &BespokeConfig, report: &mut ValidationReport) {
    let level = config.logging.level.trim();
    // Directives such as `bespoke=debug` are passed through to EnvFilter.
    if !level.contains('=') && !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        report.warn("logging.level", format!("unknown log level '{level}'; using it as a filter"));
    }
}

fn validate_document(config: &BespokeConfig, report: &mut ValidationReport) {
    let mut ids = HashSet::new();
    for (i, top) in config.document.iter().enumerate() {
        for spec in top.walk() {
            if spec.tag.trim().is_empty() {
                report.error(format!("document[{i}]"), "element tag cannot be empty");
            }
            if let Some(id) = &spec.id {
                if !ids.insert(id.as_str()) {
                    report.error(format!("document[{i}]"), format!("duplicate element id '{id}'"));
                }
            }
            if let Some(repeat) = &spec.repeat {
                if repeat.tag.trim().is_empty() {
                    report.error(format!("document[{i}].repeat"), "repeat tag cannot be empty");
                }
            }
        }
    }
}

fn validate_decks(config: &BespokeConfig, report: &mut ValidationReport) {
    if config.decks.is_empty() {
        report.warn("decks", "no decks configured");
        return;
    }

    let document: Element = config.build_document();
    for (i, deck) in config.decks.iter().enumerate() {
        let path = format!("decks[{i}]");
        if deck.container.trim().is_empty() {
            report.error(format!("{path}.container"), "container selector cannot be empty");
            continue;
        }
        if let Some(flavor) = &deck.flavor {
            if flavor.trim().is_empty() {
                report.error(format!("{path}.flavor"), "flavor cannot be empty");
            }
        }

        match document.locate(&deck.container) {
            None => report.error(
                format!("{path}.container"),
                format!("selector '{}' matches nothing in the document", deck.container),
            ),
            Some(el) if deck.slide_selector().select(&el).is_empty() => {
                report.warn(format!("{path}.container"), "deck has no slides")
            }
            Some(_) => {}
        }
    }
}
