//! Error types for tether-sync.

use std::path::PathBuf;

use thiserror::Error;

use tether_session::SessionError;

/// Error surface for mirroring and the remote registry.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// The transfer tool failed in a way we do not retry (or its single
    /// retry failed too).
    #[error("transfer failed (exit {exit_code}): {stderr}")]
    Transfer { exit_code: i32, stderr: String },

    /// A remote command run on the sync path returned non-zero.
    #[error("remote {action} failed with exit code {exit_code}")]
    Remote {
        action: &'static str,
        exit_code: i32,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
