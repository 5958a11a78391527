//! Session-holding and remote-clean commands against fake transports.

use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("chmod script");
    }
    path
}

fn tether_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tether"));
    cmd.current_dir(dir);
    cmd
}

// ---------------------------------------------------------------------------
// session
// ---------------------------------------------------------------------------

#[test]
fn session_reports_already_live_socket() {
    let dir = TempDir::new().expect("tempdir");
    let sock = dir.path().join("sock");
    std::fs::write(&sock, b"").expect("socket file");
    // Never invoked: an existing socket short-circuits the spawn.
    let ssh = write_script(dir.path(), "fake-ssh", "exit 99");

    tether_cmd(dir.path())
        .args(["session", "devbox", "--socket"])
        .arg(&sock)
        .arg("--ssh-program")
        .arg(&ssh)
        .assert()
        .success()
        .stdout(contains("already live"));

    assert!(sock.exists(), "a reused socket must be left alone");
}

#[test]
fn session_holds_master_then_cleans_up() {
    let dir = TempDir::new().expect("tempdir");
    let sock = dir.path().join("sock");
    let ssh = write_script(
        dir.path(),
        "fake-ssh",
        "if [ \"$1\" = \"-M\" ]; then\ntouch \"$3\"\nsleep 1\nexit 0\nfi\nexit 0",
    );

    tether_cmd(dir.path())
        .args(["session", "devbox", "--socket"])
        .arg(&sock)
        .arg("--ssh-program")
        .arg(&ssh)
        .assert()
        .success()
        .stdout(contains("session for 'devbox' established"));

    assert!(!sock.exists(), "clean master exit must remove the socket");
}

#[test]
fn failed_master_maps_to_255() {
    let dir = TempDir::new().expect("tempdir");
    let sock = dir.path().join("sock");
    let ssh = write_script(
        dir.path(),
        "fake-ssh",
        "if [ \"$1\" = \"-M\" ]; then\ntouch \"$3\"\nsleep 1\nexit 5\nfi\nexit 0",
    );

    tether_cmd(dir.path())
        .args(["session", "devbox", "--socket"])
        .arg(&sock)
        .arg("--ssh-program")
        .arg(&ssh)
        .assert()
        .failure()
        .code(255);

    assert!(!sock.exists(), "socket must not outlive its master");
}

// ---------------------------------------------------------------------------
// clean
// ---------------------------------------------------------------------------

#[test]
fn clean_removes_remote_mirror() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(
        dir.path().join(".tether.yml"),
        "project hash: DEADBEEFDEADBEEF\n",
    )
    .expect("config");
    let sock = dir.path().join("sock");
    std::fs::write(&sock, b"").expect("socket file");
    let log = dir.path().join("ssh-argv");
    let ssh = write_script(
        dir.path(),
        "fake-ssh",
        &format!("printf '%s\\n' \"$*\" >> \"{}\"\nexit 0", log.display()),
    );

    tether_cmd(dir.path())
        .args(["clean", "devbox", "--socket"])
        .arg(&sock)
        .arg("--ssh-program")
        .arg(&ssh)
        .assert()
        .success()
        .stdout(contains("Removed ~/.tether/DEADBEEFDEADBEEF"));

    let recorded = std::fs::read_to_string(&log).expect("ssh argv");
    assert!(
        recorded.contains("rm\\ -rf\\ ~/.tether/DEADBEEFDEADBEEF"),
        "argv was: {recorded}"
    );
    assert!(sock.exists(), "a reused socket must survive clean");
}

#[test]
fn failed_clean_reports_remote_exit() {
    let dir = TempDir::new().expect("tempdir");
    let sock = dir.path().join("sock");
    std::fs::write(&sock, b"").expect("socket file");
    let ssh = write_script(dir.path(), "fake-ssh", "exit 2");

    tether_cmd(dir.path())
        .args(["clean", "devbox", "--socket"])
        .arg(&sock)
        .arg("--ssh-program")
        .arg(&ssh)
        .assert()
        .failure()
        .stderr(contains("failed to remove"));
}
