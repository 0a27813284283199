use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Configuration missing: {0}")]
    ConfigMissing(String),

    #[error("Configuration invalid: {0}")]
    ConfigInvalid(String),

    #[error("Config file error at {path}: {message}")]
    ConfigFile { path: PathBuf, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backend error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("No search has been submitted yet")]
    NoActiveSearch,

    #[error("No result at index {index} ({len} results rendered)")]
    NoSuchResult { index: usize, len: usize },

    #[error("Not a search location: {0}")]
    InvalidLocation(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
