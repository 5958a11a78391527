//! Config error-message and starter-file integration tests.
//!
//! `.tether.yml` is the only file tether reads from a project; losing the
//! absent-vs-malformed distinction would make every unconfigured project an
//! error, so both sides get pinned here.

use assert_fs::prelude::*;
use predicates::prelude::predicate;
use tether_core::{config, ConfigError};

// ---------------------------------------------------------------------------
// 1. Load behavior
// ---------------------------------------------------------------------------

#[test]
fn absent_config_is_not_an_error() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let loaded = config::load_at(dir.path()).expect("load");
    assert!(loaded.is_none());
}

#[test]
fn malformed_config_names_the_file() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    dir.child(".tether.yml")
        .write_str("ignore: [unclosed\n")
        .expect("write");

    let err = config::load_at(dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    let msg = err.to_string();
    assert!(msg.contains(".tether.yml"), "must contain file path, got: {msg}");
    let source_msg = match &err {
        ConfigError::Parse { source, .. } => source.to_string(),
        _ => unreachable!(),
    };
    assert!(!source_msg.is_empty(), "serde_yaml must provide error context");
}

#[test]
fn spaced_keys_parse() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    dir.child(".tether.yml")
        .write_str("---\nignore:\n    - .git\n\non change:\n    - ./build\n    - make test\n")
        .expect("write");

    let loaded = config::load_at(dir.path()).expect("load").expect("present");
    assert_eq!(loaded.ignore, vec![".git"]);
    assert_eq!(loaded.on_change, vec!["./build", "make test"]);
}

#[test]
fn unknown_keys_are_ignored() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    dir.child(".tether.yml")
        .write_str("ignore:\n  - .git\nfuture key: whatever\n")
        .expect("write");

    let loaded = config::load_at(dir.path()).expect("load").expect("present");
    assert_eq!(loaded.ignore, vec![".git"]);
}

// ---------------------------------------------------------------------------
// 2. Starter file
// ---------------------------------------------------------------------------

#[test]
fn starter_file_lands_in_dir() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    config::write_starter_at(dir.path()).expect("write starter");

    dir.child(".tether.yml")
        .assert(predicate::path::exists())
        .assert(predicate::str::contains("ignore:"))
        .assert(predicate::str::contains("on change:"));
}

#[test]
fn starter_refuses_to_clobber() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    dir.child(".tether.yml").write_str("ignore: []\n").expect("write");

    let err = config::write_starter_at(dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::AlreadyExists { .. }), "got: {err}");

    dir.child(".tether.yml").assert("ignore: []\n");
}
