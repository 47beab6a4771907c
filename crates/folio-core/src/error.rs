//! Error types for Folio.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration, rejected before any document is parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unreadable or unsupported input at the extractor boundary.
    #[error("Input error: {0}")]
    Input(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
