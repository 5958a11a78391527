//! Mirroring a local tree onto the remote host over the control session.
//!
//! One forward transfer per run: archive mode, itemized changes on stdout,
//! excludes from config, transport overridden to ride the existing control
//! socket. The captured report feeds [`crate::report`]; a missing-parent
//! failure gets one remote `mkdir -p` of the parent and one retry.
//! Creating only the parent keeps the root-creation record intact on the
//! retried transfer.

use std::path::Path;
use std::time::Instant;

use tether_core::HostIdentity;
use tether_session::{exec, CapturedOutput, Session, SessionError, StdoutRouting};

use crate::classify;
use crate::error::{io_err, SyncError};
use crate::report;

/// Knobs for [`mirror`]. `Default` is production behavior; tests
/// substitute the transfer program.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Transfer program invoked locally.
    pub rsync_program: String,
    /// Create the missing destination parent and retry once. The second
    /// failure of any kind is fatal either way.
    pub mkdir_retry: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            rsync_program: "rsync".to_string(),
            mkdir_retry: true,
        }
    }
}

/// What one mirror pass did. Produced fresh per call, never persisted.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// At least one entry changed on the remote side.
    pub changed_files: bool,
    /// The mirror directory itself was created by this transfer.
    pub first_creation: bool,
    /// Verbatim itemized report, one record per line.
    pub raw_report: String,
}

// ---------------------------------------------------------------------------
// 1. Argument assembly
// ---------------------------------------------------------------------------

/// `-a -i --exclude=<p>... -e "<ssh> -o ControlPath=<socket>" <root>/ <host>:<remote>`.
fn transfer_args(
    ssh_program: &str,
    socket: &Path,
    host: &HostIdentity,
    local_root: &Path,
    remote_path: &str,
    ignore: &[String],
) -> Vec<String> {
    let mut args = vec!["-a".to_string(), "-i".to_string()];
    for pattern in ignore {
        args.push(format!("--exclude={pattern}"));
    }
    args.push("-e".to_string());
    args.push(format!("{ssh_program} -o ControlPath={}", socket.display()));
    // Trailing slash: mirror the contents of the root, not the root itself.
    args.push(format!("{}/", local_root.display()));
    args.push(format!("{host}:{remote_path}"));
    args
}

/// Reverse form: `<host>:<remote>/<path>...` into a local directory.
fn copy_back_args(
    ssh_program: &str,
    socket: &Path,
    host: &HostIdentity,
    remote_path: &str,
    paths: &[String],
    dest: &Path,
) -> Vec<String> {
    let mut args = vec![
        "-a".to_string(),
        "-i".to_string(),
        "-e".to_string(),
        format!("{ssh_program} -o ControlPath={}", socket.display()),
    ];
    for path in paths {
        args.push(format!("{host}:{remote_path}/{path}"));
    }
    args.push(format!("{}/", dest.display()));
    args
}

/// Parent of a remote path, textually. Remote paths are strings for the
/// remote shell, never local `Path`s.
fn remote_parent(remote_path: &str) -> Option<&str> {
    match remote_path.rsplit_once('/') {
        Some(("", _)) | None => None,
        Some((parent, _)) => Some(parent),
    }
}

// ---------------------------------------------------------------------------
// 2. Forward mirror
// ---------------------------------------------------------------------------

/// Mirror `local_root` onto `<host>:<remote_path>` through `session`.
pub fn mirror(
    session: &Session,
    local_root: &Path,
    remote_path: &str,
    ignore: &[String],
    options: &SyncOptions,
) -> Result<SyncOutcome, SyncError> {
    ensure_transfer_tool(&options.rsync_program)?;
    let started = Instant::now();
    let args = transfer_args(
        session.ssh_program(),
        session.socket_path(),
        session.host(),
        local_root,
        remote_path,
        ignore,
    );

    let mut attempt = run_transfer(&options.rsync_program, &args)?;
    if !attempt.success() && options.mkdir_retry && classify::is_missing_parent(&attempt.stderr) {
        let parent = remote_parent(remote_path).unwrap_or("~");
        tracing::info!(parent, "destination parent missing, creating it and retrying once");
        let mkdir = exec::run(
            session,
            "~",
            &format!("mkdir -p {parent}"),
            StdoutRouting::ToStderr,
        )?;
        if !mkdir.success() {
            return Err(SyncError::Remote {
                action: "mkdir",
                exit_code: mkdir.exit_code,
            });
        }
        attempt = run_transfer(&options.rsync_program, &args)?;
    }
    if !attempt.success() {
        return Err(SyncError::Transfer {
            exit_code: attempt.exit_code,
            stderr: attempt.stderr.trim().to_string(),
        });
    }

    let outcome = SyncOutcome {
        changed_files: report::has_changes(&attempt.stdout),
        first_creation: report::saw_root_creation(&attempt.stdout),
        raw_report: attempt.stdout,
    };
    tracing::info!(
        host = %session.host(),
        entries = report::entry_count(&outcome.raw_report),
        changed = outcome.changed_files,
        first_creation = outcome.first_creation,
        duration_ms = started.elapsed().as_millis() as u64,
        "mirror complete",
    );
    Ok(outcome)
}

/// Fail before the first transfer when the tool is not on `PATH`, instead
/// of surfacing a bare spawn error mid-run.
fn ensure_transfer_tool(program: &str) -> Result<(), SyncError> {
    which::which(program)
        .map(|_| ())
        .map_err(|e| SyncError::Session(SessionError::MissingTool {
            name: program.to_string(),
            source: e,
        }))
}

fn run_transfer(program: &str, args: &[String]) -> Result<CapturedOutput, SyncError> {
    let captured = exec::run_captured(program, args)?;
    if !captured.success() {
        tracing::debug!(
            exit_code = captured.exit_code,
            stderr = %captured.stderr.trim(),
            "transfer attempt failed",
        );
    }
    Ok(captured)
}

// ---------------------------------------------------------------------------
// 3. Copy-back
// ---------------------------------------------------------------------------

/// Pull `paths` (relative to the mirror root) from the remote host into
/// `dest`, creating `dest` if needed. One reverse transfer for all paths.
pub fn copy_back(
    session: &Session,
    remote_path: &str,
    paths: &[String],
    dest: &Path,
    options: &SyncOptions,
) -> Result<(), SyncError> {
    if paths.is_empty() {
        return Ok(());
    }
    ensure_transfer_tool(&options.rsync_program)?;
    std::fs::create_dir_all(dest).map_err(|e| io_err(dest, e))?;

    let args = copy_back_args(
        session.ssh_program(),
        session.socket_path(),
        session.host(),
        remote_path,
        paths,
        dest,
    );
    let attempt = run_transfer(&options.rsync_program, &args)?;
    if !attempt.success() {
        return Err(SyncError::Transfer {
            exit_code: attempt.exit_code,
            stderr: attempt.stderr.trim().to_string(),
        });
    }
    tracing::info!(
        host = %session.host(),
        paths = paths.len(),
        dest = %dest.display(),
        "copy-back complete",
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn host() -> HostIdentity {
        HostIdentity::from("devbox")
    }

    #[test]
    fn transfer_args_order_and_shape() {
        let args = transfer_args(
            "ssh",
            Path::new("/tmp/tetherctl/alice/devbox"),
            &host(),
            Path::new("/home/alice/proj"),
            "~/.tether/AB12CD34EF561122",
            &[".git".to_string(), "node_modules/**".to_string()],
        );
        assert_eq!(
            args,
            vec![
                "-a",
                "-i",
                "--exclude=.git",
                "--exclude=node_modules/**",
                "-e",
                "ssh -o ControlPath=/tmp/tetherctl/alice/devbox",
                "/home/alice/proj/",
                "devbox:~/.tether/AB12CD34EF561122",
            ]
        );
    }

    #[test]
    fn transfer_args_without_ignores() {
        let args = transfer_args(
            "ssh",
            Path::new("/tmp/sock"),
            &host(),
            Path::new("/p"),
            "~/.tether/X",
            &[],
        );
        assert!(!args.iter().any(|a| a.starts_with("--exclude")));
        assert_eq!(args.len(), 6);
    }

    #[test]
    fn exclude_order_follows_config_order() {
        let args = transfer_args(
            "ssh",
            Path::new("/tmp/sock"),
            &host(),
            Path::new("/p"),
            "~/.tether/X",
            &["b".to_string(), "a".to_string()],
        );
        let excludes: Vec<&String> =
            args.iter().filter(|a| a.starts_with("--exclude=")).collect();
        assert_eq!(excludes, ["--exclude=b", "--exclude=a"]);
    }

    #[test]
    fn copy_back_args_pull_into_dest() {
        let args = copy_back_args(
            "ssh",
            Path::new("/tmp/sock"),
            &host(),
            "~/.tether/AB12",
            &["target/release/app".to_string(), "docs".to_string()],
            &PathBuf::from("copyback-devbox"),
        );
        assert_eq!(
            args,
            vec![
                "-a",
                "-i",
                "-e",
                "ssh -o ControlPath=/tmp/sock",
                "devbox:~/.tether/AB12/target/release/app",
                "devbox:~/.tether/AB12/docs",
                "copyback-devbox/",
            ]
        );
    }

    #[test]
    fn remote_parent_of_mirror_path() {
        assert_eq!(remote_parent("~/.tether/AB12"), Some("~/.tether"));
        assert_eq!(remote_parent("~/.tether"), Some("~"));
        assert_eq!(remote_parent("plain"), None);
        assert_eq!(remote_parent("/rooted"), None);
    }
}
