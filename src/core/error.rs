//! Error types for the arletters core

use thiserror::Error;

/// Main error type for the asset pipeline
///
/// Transient spatial conditions (no qualifying plane, invalid hit-test,
/// anchor creation failure) are deliberately NOT errors — they are absorbed
/// as `None` by the session loop and retried on the next frame or tap.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown asset identifier: {0}")]
    UnknownAsset(String),

    #[error("download failed for {key}: {reason}")]
    Download { key: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),
}
