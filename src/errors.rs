//! Error types for LifeLink.
//!
//! None of these reach the caller of `Router::route`; they surface from the
//! loaders and from the remote source, and the router degrades on them.

use thiserror::Error;

/// Errors raised while loading the static knowledge store.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// Knowledge file could not be read.
    #[error("Knowledge IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Knowledge file is not valid JSON of the expected shape.
    #[error("Knowledge JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The `general_disaster` entry is absent.
    #[error("Knowledge store has no general_disaster entry")]
    MissingGeneric,

    /// The `general_disaster` entry exists but has no dos or no don'ts.
    #[error("Knowledge store general_disaster entry is incomplete: {0}")]
    IncompleteGeneric(String),
}

/// Errors from learned-answer cache persistence.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Durable storage could not be read or written.
    #[error("Learned cache IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored mapping could not be (de)serialized.
    #[error("Learned cache JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// In-memory backend lock was poisoned.
    #[error("Learned cache lock poisoned: {0}")]
    Lock(String),
}

/// Errors from a remote answer source.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// No credential was configured for this process.
    #[error("Remote answer source is not configured")]
    Unavailable,

    /// Transport failure (connect, timeout, body read).
    #[error("Remote HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the service.
    #[error("Remote API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Error object embedded in a success response.
    #[error("Remote API error: {0}")]
    Api(String),

    /// Response body did not have the expected shape.
    #[error("Malformed remote response: {0}")]
    MalformedResponse(String),

    /// Response parsed but carried no usable text.
    #[error("Remote API returned an empty answer")]
    EmptyResponse,
}

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Config IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid YAML.
    #[error("Config YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
