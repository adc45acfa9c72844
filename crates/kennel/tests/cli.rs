//! Tests for the `kennel` binary's offline commands.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn kennel() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_kennel"));
    cmd.env("RUST_LOG", "off");
    cmd
}

#[test]
fn config_validate_accepts_good_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[storage]\nextension = \"txt\"\n").unwrap();

    kennel()
        .args(["config", "validate", "--file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid."));
}

#[test]
fn config_validate_fails_on_bad_file() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.toml");
    let bad = dir.path().join("bad.toml");
    fs::write(&good, "").unwrap();
    fs::write(&bad, "[storage]\nextension = \"../x\"\n").unwrap();

    kennel()
        .arg("--config")
        .arg(&good)
        .args(["config", "validate", "--file"])
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("extension"));
}

#[test]
fn record_save_then_show() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let data = dir.path().join("records");
    fs::write(
        &config,
        format!("[storage]\ndata_dir = {:?}\n", data.display().to_string()),
    )
    .unwrap();

    kennel()
        .arg("--config")
        .arg(&config)
        .args(["record", "save", "rex", "Good boy"])
        .assert()
        .success();
    assert_eq!(fs::read(data.join("rex.dog")).unwrap(), b"Good boy");

    kennel()
        .arg("--config")
        .arg(&config)
        .args(["record", "show", "rex"])
        .assert()
        .success()
        .stdout("Good boy");
}

#[test]
fn record_show_rejects_bad_name() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(
        &config,
        format!(
            "[storage]\ndata_dir = {:?}\n",
            dir.path().join("records").display().to_string()
        ),
    )
    .unwrap();

    kennel()
        .arg("--config")
        .arg(&config)
        .args(["record", "show", "../etc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid record name"));
}
