//! Command-line tests for the source-fetch binary

use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Write a config whose cache root lives inside `dir`
fn write_config(dir: &TempDir) -> std::path::PathBuf {
    let config = dir.path().join("config.toml");
    std::fs::write(
        &config,
        format!(
            "[defines]\n_sourcedir = \"{}\"\n",
            dir.path().join("sources").display()
        ),
    )
    .unwrap();
    config
}

#[test]
fn test_closed_stdout_does_not_abort_fetch() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    let mut child = Command::new(env!("CARGO_BIN_EXE_source-fetch"))
        .args(["--config"])
        .arg(&config)
        .args(["--dry-run", "get", "http://127.0.0.1:9/foo.tar.gz"])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    // Close the read end so every write to stdout fails with EPIPE
    drop(child.stdout.take());

    let status = child.wait().unwrap();
    assert_eq!(status.code(), Some(0));
}

#[test]
fn test_resolve_prints_descriptor_json() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    let out = Command::new(env!("CARGO_BIN_EXE_source-fetch"))
        .args(["--config"])
        .arg(&config)
        .args(["resolve", "ftp://ftp.example.org/pub/foo-1.0.tar.bz2"])
        .output()
        .unwrap();

    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["type"], "ftp");
    assert_eq!(json["kind"], "plain");
    assert_eq!(json["compression"], "bzip2");
    assert_eq!(json["ext"], ".tar.bz2");
}
