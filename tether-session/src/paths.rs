use std::path::{Path, PathBuf};
use std::time::Duration;

use tether_core::HostIdentity;

use crate::error::SessionError;

/// Directory under the system temp root holding one control socket per
/// (user, host) pair.
pub const SOCKET_DIR_NAME: &str = "tetherctl";

/// How often acquire re-checks for the socket while the master starts up.
pub const SOCKET_POLL_INTERVAL: Duration = Duration::from_millis(40);

/// Ceiling on the whole socket wait. Generous, since the master may sit in
/// an interactive auth prompt.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// `<tmp>/tetherctl/<user>/<host>` — pure, no I/O.
pub fn socket_path_for(tmp: &Path, user: &str, host: &HostIdentity) -> PathBuf {
    tmp.join(SOCKET_DIR_NAME).join(user).join(host.as_str())
}

/// Default socket path for `host`, under the system temp root and the
/// invoking user's name.
pub fn default_socket_path(host: &HostIdentity) -> Result<PathBuf, SessionError> {
    Ok(socket_path_for(&std::env::temp_dir(), &invoking_user()?, host))
}

/// Invoking user from the environment: `$USER`, then `$USERNAME`.
pub fn invoking_user() -> Result<String, SessionError> {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .map_err(|_| SessionError::UserUnknown)?;
    if user.is_empty() {
        return Err(SessionError::UserUnknown);
    }
    Ok(user)
}
