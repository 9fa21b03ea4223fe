use std::path::PathBuf;

use crate::config::ConfigError;

/// Errors surfaced by resource commands and the HTTP client.
///
/// Token resolution has no variant here: a missing token is a normal
/// outcome, not an error.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("http error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    #[error("{kind} \"{name}\" is not found")]
    NotFound { kind: &'static str, name: String },

    #[error("failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid resource in {}: {reason}", path.display())]
    InvalidResource { path: PathBuf, reason: String },

    #[error("invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Usage(#[from] clap::Error),
}
