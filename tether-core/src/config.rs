//! Project config (`.tether.yml`) loading.
//!
//! # File shape
//!
//! ```text
//! ---
//! ignore:
//!     - .git
//!     - node_modules/**
//!
//! on change:
//!     - ./build
//!
//! project hash: CAFE000011112222      (optional, overrides derivation)
//! ```
//!
//! # API pattern
//!
//! Every function takes the project directory explicitly
//! (`fn_at(dir: &Path, …)`); a `load()` convenience wrapper uses the
//! current working directory. Tests must always use the `_at` forms.
//!
//! An absent file is a normal condition (`Ok(None)`), distinct from a
//! malformed file (`ConfigError::Parse`), which is fatal before any remote
//! state is touched.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, ConfigError};

/// File name looked up in the project root.
pub const CONFIG_FILE_NAME: &str = ".tether.yml";

/// Template written by `tether init`.
pub const STARTER_CONFIG: &str = "---
ignore:
    - .git
    - node_modules/**

on change:
    - ./build
";

// ---------------------------------------------------------------------------
// Config shape
// ---------------------------------------------------------------------------

/// Everything `.tether.yml` may carry. All keys are optional; unknown keys
/// are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProjectConfig {
    /// Exclusion patterns handed to the transfer tool, in declared order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,

    /// Shell commands run remotely, in declared order, after a sync that
    /// changed files.
    #[serde(default, rename = "on change", skip_serializing_if = "Vec::is_empty")]
    pub on_change: Vec<String>,

    /// Explicit fingerprint override; when set, hostname/cwd derivation is
    /// skipped entirely.
    #[serde(default, rename = "project hash", skip_serializing_if = "Option::is_none")]
    pub project_hash: Option<String>,
}

// ---------------------------------------------------------------------------
// 1. Path helper
// ---------------------------------------------------------------------------

/// `<dir>/.tether.yml` — pure, no I/O.
pub fn config_path_at(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

// ---------------------------------------------------------------------------
// 2. Load
// ---------------------------------------------------------------------------

/// Load `<dir>/.tether.yml`.
///
/// Returns `Ok(None)` if the file does not exist, `ConfigError::Parse`
/// (with path and line context) if it exists but is malformed YAML.
pub fn load_at(dir: &Path) -> Result<Option<ProjectConfig>, ConfigError> {
    let path = config_path_at(dir);
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    let config =
        serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse { path, source: e })?;
    Ok(Some(config))
}

/// `load_at` against the current working directory.
pub fn load() -> Result<Option<ProjectConfig>, ConfigError> {
    let cwd = std::env::current_dir().map_err(|e| io_err(".", e))?;
    load_at(&cwd)
}

// ---------------------------------------------------------------------------
// 3. Starter file
// ---------------------------------------------------------------------------

/// Write the starter template to `<dir>/.tether.yml`.
///
/// Refuses to overwrite: returns `ConfigError::AlreadyExists` when a config
/// file is already present.
pub fn write_starter_at(dir: &Path) -> Result<PathBuf, ConfigError> {
    let path = config_path_at(dir);
    if path.exists() {
        return Err(ConfigError::AlreadyExists { path });
    }
    std::fs::write(&path, STARTER_CONFIG).map_err(|e| io_err(&path, e))?;
    Ok(path)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
