//! Structured Logger
//!
//! Wraps `tracing` with a console layer (plain or JSON), an optional
//! daily-rolling NDJSON file layer, and environment-based level control.

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// File name prefix for rolled log files: `bespoke.log.YYYY-MM-DD`.
pub const LOG_FILE_PREFIX: &str = "bespoke.log";

#[derive(Debug, Clone)]
pub struct LoggerSettings {
    /// Filter used when `RUST_LOG` is not set.
    pub level: String,
    pub json: bool,
    pub dir: Option<PathBuf>,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self { level: "info".into(), json: false, dir: None }
    }
}

impl LoggerSettings {
    pub fn new(level: impl Into<String>) -> Self {
        Self { level: level.into(), ..Self::default() }
    }

    pub fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn dir(mut self, dir: Option<impl Into<PathBuf>>) -> Self {
        self.dir = dir.map(Into::into);
        self
    }

    /// `RUST_LOG` wins over the configured level; an unparsable level falls
    /// back to `info`.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Initialize the global logger. Returns `false` if a global subscriber was
/// already installed (the existing one is kept).
pub fn init_logger(settings: &LoggerSettings) -> bool {
    let console_layer = if settings.json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(true)
            .boxed()
    };

    let file_layer = settings.dir.as_ref().map(|dir| {
        let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
        fmt::layer().json().with_writer(appender).with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(settings.env_filter())
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok()
}
