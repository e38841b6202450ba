use std::path::PathBuf;

use thiserror::Error;

/// Error surface for the webhook gateway.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("configuration error: {0}")]
    Config(#[from] geosync_core::ConfigError),

    #[error("sync error: {0}")]
    Sync(#[from] geosync_sync::SyncError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("checkout refresh in {dir} exited with {}: {stderr}", exit_label(.status))]
    Refresh {
        dir: PathBuf,
        status: Option<i32>,
        stderr: String,
    },
}

fn exit_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> HookError {
    HookError::Io {
        path: path.into(),
        source,
    }
}
