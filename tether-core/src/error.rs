//! Error types for tether-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from project config handling.
///
/// Note that an absent config file is not an error; `config::load_at`
/// returns `Ok(None)` for that case.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure reading or writing the config file.
    #[error("config I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `init` refuses to overwrite an existing config file.
    #[error("config file already exists at {path}")]
    AlreadyExists { path: PathBuf },
}

/// Shorthand for wrapping an I/O error with its path.
pub fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io { path: path.into(), source }
}
