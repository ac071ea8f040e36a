use std::path::PathBuf;

use thiserror::Error;

/// Partitioning cannot start without at least one item
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionError {
    #[error("no items to partition")]
    NoInput,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum EnvelopeError {
    #[error("failed to serialize shapes: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Partition(#[from] PartitionError),
}

/// The server reported a failure in its response body
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("server rejected the request: {0}")]
pub struct RejectedResponse(pub String);
