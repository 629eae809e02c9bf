use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn doctor_fails_when_explicit_config_missing() {
    let tmp = tempdir().unwrap();
    let missing = tmp.path().join("absent.toml");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("docfill"));
    cmd.args(["doctor", "--config", missing.to_str().unwrap()]);
    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("FAIL docfill doctor"))
        .stdout(predicate::str::contains("looked for:").not());
}

#[test]
fn doctor_fails_on_unknown_profile() {
    let tmp = tempdir().unwrap();
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("docfill"));
    cmd.env("XDG_CONFIG_HOME", tmp.path()); // empty dir, built-in defaults
    cmd.args(["--profile", "work", "doctor"]);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("FAIL docfill doctor"))
        .stdout(predicate::str::contains("work"))
        .stdout(predicate::str::contains("looked for:"));
}

#[test]
fn doctor_fails_on_unknown_language() {
    let tmp = tempdir().unwrap();
    let cfg = tmp.path().join("config.toml");
    fs::write(
        &cfg,
        r#"
version = 1
[profiles.default]
templates_dir = "/tmp/t"
output_dir    = "/tmp/o"
[words]
language = "fr"
"#,
    )
    .unwrap();

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("docfill"));
    cmd.args(["doctor", "--config", cfg.to_str().unwrap()]);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("FAIL docfill doctor"))
        .stdout(predicate::str::contains("fr"));
}
