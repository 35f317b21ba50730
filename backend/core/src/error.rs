use thiserror::Error;

/// Top-level error type for deck construction.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("no document attached; cannot resolve selector '{0}'")]
    NoDocument(String),

    #[error("container not found: {0}")]
    ContainerNotFound(String),

    #[error("invalid plugin options: {0}")]
    InvalidOptions(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T, E = DeckError> = std::result::Result<T, E>;
