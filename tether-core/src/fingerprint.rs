//! Remote mirror path derivation.
//!
//! Every project gets a mirror directory under `~/.tether/` on the remote
//! host, named by a [`Fingerprint`]: the first 16 uppercase hex characters
//! of `SHA-256(hostname + "\n" + project_root)`. The truncated digest is an
//! identifier, not a security boundary; it only has to be stable and
//! collision-free across the projects one person mirrors to one host.
//!
//! A `project hash` key in `.tether.yml` bypasses derivation entirely, for
//! projects that move between checkouts or machines but should keep one
//! remote mirror.

use std::path::Path;
use std::process::Command;

use sha2::{Digest, Sha256};

use crate::config::ProjectConfig;
use crate::types::Fingerprint;

/// Remote directory holding all mirrors and the registry file.
pub const REMOTE_ROOT: &str = "~/.tether";

/// Hex characters kept from the full digest.
pub const FINGERPRINT_LEN: usize = 16;

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Derive the fingerprint for `project_root` as seen from `hostname`.
///
/// Same (hostname, project_root) pair always yields the same fingerprint,
/// so repeated invocations from the same checkout converge on the same
/// remote mirror.
pub fn derive(hostname: &str, project_root: &Path) -> Fingerprint {
    let mut h = Sha256::new();
    h.update(hostname.as_bytes());
    h.update(b"\n");
    h.update(project_root.to_string_lossy().as_bytes());
    let hex = hex::encode_upper(h.finalize());
    Fingerprint(hex[..FINGERPRINT_LEN].to_string())
}

/// The fingerprint to use for this run: the configured `project hash` when
/// present, otherwise [`derive`].
pub fn resolve(
    config: Option<&ProjectConfig>,
    hostname: &str,
    project_root: &Path,
) -> Fingerprint {
    match config.and_then(|c| c.project_hash.as_deref()) {
        Some(explicit) => Fingerprint::from(explicit),
        None => derive(hostname, project_root),
    }
}

/// `~/.tether/<fingerprint>` — the mirror directory on the remote host.
/// Expanded by the remote shell, never locally.
pub fn remote_mirror_path(fingerprint: &Fingerprint) -> String {
    format!("{REMOTE_ROOT}/{fingerprint}")
}

// ---------------------------------------------------------------------------
// Hostname lookup
// ---------------------------------------------------------------------------

/// Best-effort local hostname: `uname -n`, then `$HOSTNAME`, then
/// `"localhost"`. Only feeds the fingerprint digest, so a stable answer
/// matters more than a canonical one.
pub fn local_hostname() -> String {
    if let Ok(output) = Command::new("uname").arg("-n").output() {
        if output.status.success() {
            let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !name.is_empty() {
                return name;
            }
        }
    }
    std::env::var("HOSTNAME")
        .ok()
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
