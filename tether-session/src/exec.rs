//! Remote execution over an established session.
//!
//! A non-empty command is wrapped as `cd <dir> && <command>`, quoted as one
//! word, and handed to the remote login shell; an empty command opens an
//! interactive session with the terminal attached. Hooks route their
//! stdout into our stderr so the primary stdout stream stays reserved for
//! the user command.

use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use tether_core::quote::backslash_quote;
use tether_core::HostIdentity;

use crate::error::{io_err, SessionError};
use crate::manager::Session;

/// Remote login shell invocation that receives the quoted command word.
pub const REMOTE_SHELL: &str = "bash -lc";

// ---------------------------------------------------------------------------
// 1. Outcome types
// ---------------------------------------------------------------------------

/// Where the remote command's stdout goes locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdoutRouting {
    /// Child stdout stays on our stdout (the user command path).
    Inherit,
    /// Child stdout is streamed into our stderr (the hook path).
    ToStderr,
}

/// Classified remote exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecClass {
    Success,
    /// 127: the remote shell could not find the command.
    RemoteUnknownCommand,
    /// 130: interrupted at the terminal.
    Interrupted,
    /// 255: the transport itself failed (authentication, connection).
    AuthOrConnectFailure,
    OtherFailure,
}

/// Outcome of one remote invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOutcome {
    pub exit_code: i32,
    pub class: ExecClass,
}

impl ExecOutcome {
    pub fn success(&self) -> bool {
        self.class == ExecClass::Success
    }
}

/// Map an exit code onto its class.
pub fn classify(exit_code: i32) -> ExecClass {
    match exit_code {
        0 => ExecClass::Success,
        127 => ExecClass::RemoteUnknownCommand,
        130 => ExecClass::Interrupted,
        255 => ExecClass::AuthOrConnectFailure,
        _ => ExecClass::OtherFailure,
    }
}

/// Exit code of a finished child: its code when present, `128 + signal`
/// for signal-terminated children (shell convention), `-1` otherwise.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}

// ---------------------------------------------------------------------------
// 2. Argument assembly
// ---------------------------------------------------------------------------

/// `-S <socket> <host>` — the interactive form.
fn interactive_args(socket: &Path, host: &HostIdentity) -> Vec<String> {
    vec![
        "-S".to_string(),
        socket.display().to_string(),
        host.to_string(),
    ]
}

/// `-S <socket> <host> -- bash -lc <quoted compound>`.
///
/// The compound `cd <dir> && <command>` is quoted as ONE word, so the
/// remote login shell hands it to `-c` intact no matter what shell syntax
/// `command` contains.
fn command_args(
    socket: &Path,
    host: &HostIdentity,
    remote_dir: &str,
    command: &str,
) -> Vec<String> {
    let compound = format!("cd {remote_dir} && {command}");
    let mut args = interactive_args(socket, host);
    args.push("--".to_string());
    args.push(format!("{REMOTE_SHELL} {}", backslash_quote(&compound)));
    args
}

// ---------------------------------------------------------------------------
// 3. Run
// ---------------------------------------------------------------------------

/// Run `command` in `remote_dir` on the session's host, or open an
/// interactive session when `command` is empty. Stdin and stderr are
/// always attached to the caller's.
pub fn run(
    session: &Session,
    remote_dir: &str,
    command: &str,
    routing: StdoutRouting,
) -> Result<ExecOutcome, SessionError> {
    let args = if command.is_empty() {
        interactive_args(session.socket_path(), session.host())
    } else {
        command_args(session.socket_path(), session.host(), remote_dir, command)
    };
    tracing::debug!(program = session.ssh_program(), ?args, "remote invocation");

    let mut cmd = Command::new(session.ssh_program());
    cmd.args(&args)
        .stdin(Stdio::inherit())
        .stderr(Stdio::inherit());

    let status = match routing {
        StdoutRouting::Inherit => {
            cmd.stdout(Stdio::inherit());
            cmd.status().map_err(|e| SessionError::Spawn {
                program: session.ssh_program().to_string(),
                source: e,
            })?
        }
        StdoutRouting::ToStderr => {
            cmd.stdout(Stdio::piped());
            let mut child = cmd.spawn().map_err(|e| SessionError::Spawn {
                program: session.ssh_program().to_string(),
                source: e,
            })?;
            // Blocking copy; child stderr flows directly, so no deadlock.
            if let Some(mut stdout) = child.stdout.take() {
                if let Err(err) = io::copy(&mut stdout, &mut io::stderr()) {
                    tracing::warn!(error = %err, "lost remote output while routing to stderr");
                }
            }
            child.wait().map_err(|e| io_err("remote command wait", e))?
        }
    };

    let code = exit_code(status);
    Ok(ExecOutcome {
        exit_code: code,
        class: classify(code),
    })
}

// ---------------------------------------------------------------------------
// 4. Captured execution
// ---------------------------------------------------------------------------

/// Output of a locally-run tool whose streams we interpret rather than
/// display (the transfer tool).
#[derive(Debug)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CapturedOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run a local program with stdout/stderr captured and stdin closed.
/// A non-zero exit is not an error here; callers classify it.
pub fn run_captured(program: &str, args: &[String]) -> Result<CapturedOutput, SessionError> {
    tracing::debug!(program, ?args, "captured invocation");
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| SessionError::Spawn {
            program: program.to_string(),
            source: e,
        })?;

    Ok(CapturedOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code: exit_code(output.status),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, ExecClass::Success)]
    #[case(127, ExecClass::RemoteUnknownCommand)]
    #[case(130, ExecClass::Interrupted)]
    #[case(255, ExecClass::AuthOrConnectFailure)]
    #[case(1, ExecClass::OtherFailure)]
    #[case(2, ExecClass::OtherFailure)]
    #[case(126, ExecClass::OtherFailure)]
    fn classification_table(#[case] code: i32, #[case] expected: ExecClass) {
        assert_eq!(classify(code), expected);
    }

    #[test]
    fn interactive_args_shape() {
        let args = interactive_args(Path::new("/tmp/sock"), &HostIdentity::from("devbox"));
        assert_eq!(args, vec!["-S", "/tmp/sock", "devbox"]);
    }

    #[test]
    fn command_args_quote_the_compound() {
        let args = command_args(
            Path::new("/tmp/sock"),
            &HostIdentity::from("devbox"),
            "~/.tether/AB12CD34EF561122",
            "echo hi && ls",
        );
        assert_eq!(args[..4], ["-S", "/tmp/sock", "devbox", "--"]);
        assert_eq!(
            args[4],
            "bash -lc cd\\ ~/.tether/AB12CD34EF561122\\ \\&\\&\\ echo\\ hi\\ \\&\\&\\ ls"
        );
    }

    #[test]
    fn command_args_survive_quotes_in_command() {
        let args = command_args(
            Path::new("/tmp/sock"),
            &HostIdentity::from("devbox"),
            "~/proj",
            r#"echo "a b""#,
        );
        assert_eq!(args[4], "bash -lc cd\\ ~/proj\\ \\&\\&\\ echo\\ \\\"a\\ b\\\"");
    }

    #[test]
    fn exit_code_of_real_children() {
        let ok = Command::new("sh").args(["-c", "exit 0"]).status().expect("sh");
        assert_eq!(exit_code(ok), 0);
        let three = Command::new("sh").args(["-c", "exit 3"]).status().expect("sh");
        assert_eq!(exit_code(three), 3);
    }

    #[cfg(unix)]
    #[test]
    fn signal_termination_maps_to_128_plus_signal() {
        use std::os::unix::process::ExitStatusExt;
        let status = ExitStatus::from_raw(15); // SIGTERM, no core dump
        assert_eq!(exit_code(status), 143);
    }

    #[test]
    fn run_captured_collects_both_streams() {
        let out = run_captured(
            "sh",
            &["-c".to_string(), "echo out; echo err >&2; exit 4".to_string()],
        )
        .expect("spawn");
        assert_eq!(out.stdout, "out\n");
        assert_eq!(out.stderr, "err\n");
        assert_eq!(out.exit_code, 4);
        assert!(!out.success());
    }

    #[test]
    fn run_captured_missing_program_is_spawn_error() {
        let err = run_captured("definitely-not-a-real-tool-9000", &[]).unwrap_err();
        assert!(matches!(err, SessionError::Spawn { .. }), "got: {err}");
    }
}
