// src/error.rs
//! Error taxonomy for the fetch / sync / materialize pipeline.
//!
//! Only fatal conditions live here. A clean end of feed and a malformed
//! page are normal outcomes and never surface as errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// One failed attempt at the transport level. Always treated as transient.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    /// 401/403: credentials are invalid or expired. Never retried.
    #[error("authentication rejected (HTTP {status}); update the profile cookies")]
    Auth { status: u16 },

    #[error("giving up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },

    #[error("could not set up HTTP client: {0}")]
    Setup(String),
}

impl FetchError {
    pub fn is_auth(&self) -> bool {
        matches!(self, FetchError::Auth { .. })
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("bad JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io { path: path.into(), source }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        StoreError::Json { path: path.into(), source }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("config file not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("no active profile is set")]
    NoActiveProfile,

    #[error("profile '{0}' not found")]
    UnknownProfile(String),

    #[error("profile '{0}' already exists")]
    DuplicateProfile(String),

    #[error("profile name cannot be empty")]
    EmptyName,

    #[error("profile name '{0}' must not contain path separators or be '.' or '..'")]
    InvalidName(String),

    #[error("update 'custom_url' for profile '{0}'")]
    PlaceholderUrl(String),

    #[error("profile '{0}' has no 'sessionid' cookie")]
    MissingSessionId(String),
}

/// Fatal outcome of one sync pass. Cursor state is left as it was.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("could not write {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
