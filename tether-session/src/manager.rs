//! Control master lifecycle.
//!
//! The first invocation for a host spawns `ssh -M -S <socket> -N <host>`
//! and waits for the socket to appear; later invocations find the socket
//! and reuse the connection without spawning anything. Ownership is
//! recorded on the [`Session`] value itself: only the invocation that
//! created the master may kill it and delete the socket, a reused session
//! must leave both alone.
//!
//! The existence check and the spawn are not atomic; two invocations
//! racing for the same host can both decide to spawn. Known limitation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tether_core::HostIdentity;

use crate::error::{io_err, SessionError};
use crate::paths::{default_socket_path, DEFAULT_CONNECT_TIMEOUT, SOCKET_POLL_INTERVAL};

// ---------------------------------------------------------------------------
// 1. Session value
// ---------------------------------------------------------------------------

/// A reusable authenticated transport to one host.
///
/// Holds the background master process only when this acquisition spawned
/// it. `Drop` performs the same cleanup as [`Session::release`], so an
/// early error path cannot leak the process or the socket file.
#[derive(Debug)]
pub struct Session {
    host: HostIdentity,
    socket_path: PathBuf,
    ssh_program: String,
    master: Option<Child>,
    owns_socket: bool,
}

impl Session {
    pub fn host(&self) -> &HostIdentity {
        &self.host
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Program this session runs for every transport invocation.
    pub fn ssh_program(&self) -> &str {
        &self.ssh_program
    }

    /// True when this acquisition spawned the control master.
    pub fn owns_master(&self) -> bool {
        self.master.is_some()
    }

    /// True when release must delete the socket file.
    pub fn owns_socket(&self) -> bool {
        self.owns_socket
    }

    /// Block until the owned master exits and hand back its status.
    /// Returns `Ok(None)` for a reused session, which has nothing to wait
    /// on. The socket file stays in place until [`Session::release`].
    pub fn wait_master(&mut self) -> Result<Option<ExitStatus>, SessionError> {
        match self.master.as_mut() {
            Some(child) => {
                let status = child.wait().map_err(|e| io_err("control master wait", e))?;
                self.master = None;
                Ok(Some(status))
            }
            None => Ok(None),
        }
    }

    /// Tear down whatever this session owns: kill and reap the master,
    /// remove the socket file. Reused sessions own neither, so release is
    /// a no-op for them. Idempotent; failures are logged, never returned,
    /// since release runs after the primary outcome is already determined.
    pub fn release(&mut self) {
        if let Some(mut master) = self.master.take() {
            if let Err(err) = master.kill() {
                tracing::warn!(host = %self.host, error = %err, "failed to kill control master");
            }
            if let Err(err) = master.wait() {
                tracing::warn!(host = %self.host, error = %err, "failed to reap control master");
            }
        }

        if self.owns_socket {
            self.owns_socket = false;
            match std::fs::remove_file(&self.socket_path) {
                Ok(()) => {
                    tracing::debug!(socket = %self.socket_path.display(), "removed control socket");
                }
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => {
                    tracing::warn!(
                        socket = %self.socket_path.display(),
                        error = %err,
                        "failed to remove control socket",
                    );
                }
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.release();
    }
}

// ---------------------------------------------------------------------------
// 2. Acquire
// ---------------------------------------------------------------------------

/// Knobs for [`acquire`]. `Default` is production behavior; tests
/// substitute the program and socket path.
#[derive(Debug, Clone)]
pub struct AcquireOptions {
    /// Transport program; spawned as the master and reused for every exec.
    pub ssh_program: String,
    /// Socket path override; `None` derives the per-user, per-host path.
    pub socket_path: Option<PathBuf>,
    /// Ceiling on the wait for the socket to appear.
    pub connect_timeout: Duration,
}

impl Default for AcquireOptions {
    fn default() -> Self {
        Self {
            ssh_program: "ssh".to_string(),
            socket_path: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

/// Acquire a session for `host`.
///
/// An existing file at the socket path means another invocation's master is
/// listening there: the returned session reuses it and owns nothing.
/// Otherwise the parent directory is created (mode `0700`), the master is
/// spawned with stdio inherited (auth prompts must reach the terminal), and
/// the caller blocks until the socket appears. The master exiting first is
/// fatal, as is the configured deadline expiring.
pub fn acquire(host: &HostIdentity, options: &AcquireOptions) -> Result<Session, SessionError> {
    let socket_path = match &options.socket_path {
        Some(path) => path.clone(),
        None => default_socket_path(host)?,
    };

    if socket_path.exists() {
        tracing::debug!(
            host = %host,
            socket = %socket_path.display(),
            "reusing existing control socket",
        );
        return Ok(Session {
            host: host.clone(),
            socket_path,
            ssh_program: options.ssh_program.clone(),
            master: None,
            owns_socket: false,
        });
    }

    which::which(&options.ssh_program).map_err(|e| SessionError::MissingTool {
        name: options.ssh_program.clone(),
        source: e,
    })?;

    if let Some(parent) = socket_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
            set_dir_permissions(parent)?;
        }
    }

    tracing::info!(host = %host, socket = %socket_path.display(), "starting control master");
    let mut master = Command::new(&options.ssh_program)
        .arg("-M")
        .arg("-S")
        .arg(&socket_path)
        .arg("-N")
        .arg(host.as_str())
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| SessionError::Spawn {
            program: options.ssh_program.clone(),
            source: e,
        })?;

    wait_for_socket(&mut master, host, &socket_path, options.connect_timeout)?;

    Ok(Session {
        host: host.clone(),
        socket_path,
        ssh_program: options.ssh_program.clone(),
        master: Some(master),
        owns_socket: true,
    })
}

/// Poll for the socket file, supervising the child while waiting.
fn wait_for_socket(
    master: &mut Child,
    host: &HostIdentity,
    socket_path: &Path,
    timeout: Duration,
) -> Result<(), SessionError> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = master
            .try_wait()
            .map_err(|e| io_err("control master poll", e))?
        {
            return Err(SessionError::MasterExited {
                host: host.clone(),
                status,
            });
        }

        if socket_path.exists() {
            return Ok(());
        }

        if Instant::now() >= deadline {
            let _ = master.kill();
            let _ = master.wait();
            return Err(SessionError::Timeout {
                socket: socket_path.to_path_buf(),
                waited: timeout,
            });
        }

        std::thread::sleep(SOCKET_POLL_INTERVAL);
    }
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), SessionError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), SessionError> {
    Ok(())
}
