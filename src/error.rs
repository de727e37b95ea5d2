// Error values for the per-folder operations. These never escape a folder:
// `batch` turns them into a `FolderOutcome` and moves on to the next one.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while reading a metadata document from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure of a call against the repository API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered, but not with the status we expected.
    #[error("{status} - {body}")]
    Rejected { status: StatusCode, body: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("could not open {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Status code returned by the server, if the request got that far.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }
}
