//! Error types for geosync-sync.

use std::path::PathBuf;

use thiserror::Error;

use geosync_core::{ConfigError, PackageError};

/// All errors that can arise from a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Invalid settings or file selection.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A package file could not be read.
    #[error(transparent)]
    Package(#[from] PackageError),

    /// Listing datastores returned 404: the workspace is absent on the server.
    #[error("cannot list workspace datastores. Does workspace '{workspace}' exist?")]
    WorkspaceMissing { workspace: String },

    /// The server answered with a status the operation does not accept.
    #[error("unexpected status code: {status} ({method} {url})")]
    ApiStatus {
        method: &'static str,
        url: String,
        status: u16,
    },

    /// A listing response had a body that is neither empty nor a valid collection.
    #[error("malformed response from {url}: {detail}")]
    MalformedResponse { url: String, detail: String },

    /// The request never produced a response (DNS, connect, TLS, read failure).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Request payload serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
