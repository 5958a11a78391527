//! Newtypes shared across the tether workspace.
//!
//! Host identities and fingerprints travel through every crate; keeping them
//! strongly typed prevents a raw host string from ending up where a remote
//! path belongs.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// The remote endpoint as the user names it: `user@host`, a bare host name,
/// or an alias from the transport's own configuration. Opaque to tether; it
/// is handed to `ssh` verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostIdentity(pub String);

impl HostIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for HostIdentity {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for HostIdentity {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A stable identifier for "this project on this machine". Derived from the
/// local hostname and the project root (see [`crate::fingerprint`]) or set
/// explicitly via the `project hash` config key. Becomes the final path
/// segment of the remote mirror directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Fingerprint {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Fingerprint {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
