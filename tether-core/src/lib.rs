//! Tether core library — project config, fingerprints, shell quoting.
//!
//! Public API surface:
//! - [`types`] — newtypes shared across the workspace
//! - [`error`] — [`ConfigError`]
//! - [`config`] — `.tether.yml` loading and the starter template
//! - [`fingerprint`] — remote mirror path derivation
//! - [`quote`] — POSIX backslash-quoting for remote command strings

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod quote;
pub mod types;

pub use config::ProjectConfig;
pub use error::ConfigError;
pub use types::{Fingerprint, HostIdentity};
