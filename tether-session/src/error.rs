//! Error types for tether-session.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

use tether_core::HostIdentity;

/// Error surface for session lifecycle and remote execution.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("required tool `{name}` not found: {source}")]
    MissingTool {
        name: String,
        #[source]
        source: which::Error,
    },

    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("control master for {host} exited before its socket appeared ({status})")]
    MasterExited {
        host: HostIdentity,
        status: ExitStatus,
    },

    #[error("timed out after {waited:?} waiting for control socket {socket}")]
    Timeout { socket: PathBuf, waited: Duration },

    #[error("cannot determine invoking user; set $USER or $USERNAME")]
    UserUnknown,
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SessionError {
    SessionError::Io {
        path: path.into(),
        source,
    }
}
