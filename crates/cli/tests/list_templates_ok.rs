use assert_cmd::prelude::*;
use predicates::prelude::*; // needed for `.not()`
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write(path: &PathBuf, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

const SCHEMA: &str = "groups:\n  g: { fields: [{ name: x }] }\nunits:\n  - group: g\n";

fn write_config(path: &PathBuf, tpl_root: &Path, include_hidden: bool) {
    let toml = format!(
        r#"
version = 1
profile = "default"

[profiles.default]
templates_dir  = "{tpl}"
output_dir     = "{tpl}/../out"
include_hidden = {include_hidden}
"#,
        tpl = tpl_root.display(),
    );
    write(path, &toml);
}

fn template_tree(tpl_root: &Path) {
    write(&tpl_root.join("power").join("schema.yaml"), SCHEMA);
    write(&tpl_root.join("power").join("power.hbs"), "{{x}}");
    write(&tpl_root.join("lease").join("schema.yaml"), SCHEMA);
    write(&tpl_root.join("lease").join("lease.md"), "{{x}}");
    write(&tpl_root.join("_wip").join("schema.yaml"), SCHEMA);
    write(&tpl_root.join("_wip").join("wip.txt"), "{{x}}");
    write(&tpl_root.join("notes").join("readme.md"), "no schema");
}

#[test]
fn list_templates_reports_schema_directories_only() {
    let tmp = tempdir().unwrap();
    let tpl_root = tmp.path().join("docs").join("templates");
    template_tree(&tpl_root);
    let cfg_path = tmp.path().join("config.toml");
    write_config(&cfg_path, &tpl_root, false);

    // With clap: global flags can be before the subcommand
    let mut cmd = std::process::Command::new(assert_cmd::cargo::cargo_bin!("docfill"));
    cmd.env("NO_COLOR", "1");
    cmd.args(["--config", cfg_path.to_str().unwrap(), "--profile", "default", "list-templates"]);

    cmd.assert()
        .success()
        .stdout(predicates::str::contains("lease\npower\n"))
        .stdout(predicates::str::contains("-- 2 templates --"))
        .stdout(predicates::str::contains("wip").not())
        .stdout(predicates::str::contains("notes").not());
}

#[test]
fn list_templates_marks_hidden_when_included() {
    let tmp = tempdir().unwrap();
    let tpl_root = tmp.path().join("templates");
    template_tree(&tpl_root);
    let cfg_path = tmp.path().join("config.toml");
    write_config(&cfg_path, &tpl_root, true);

    let mut cmd = std::process::Command::new(assert_cmd::cargo::cargo_bin!("docfill"));
    cmd.args(["--config", cfg_path.to_str().unwrap(), "list-templates"]);

    cmd.assert()
        .success()
        .stdout(predicates::str::contains("wip (dev)"))
        .stdout(predicates::str::contains("-- 3 templates --"));
}

#[test]
fn list_templates_empty_directory() {
    let tmp = tempdir().unwrap();
    let tpl_root = tmp.path().join("templates");
    fs::create_dir_all(&tpl_root).unwrap();
    let cfg_path = tmp.path().join("config.toml");
    write_config(&cfg_path, &tpl_root, false);

    let mut cmd = std::process::Command::new(assert_cmd::cargo::cargo_bin!("docfill"));
    cmd.args(["--config", cfg_path.to_str().unwrap(), "list-templates"]);

    cmd.assert().success().stdout(predicates::str::contains("(no templates found)"));
}

#[test]
fn list_templates_fails_without_templates_dir() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("config.toml");
    write_config(&cfg_path, &tmp.path().join("missing"), false);

    let mut cmd = std::process::Command::new(assert_cmd::cargo::cargo_bin!("docfill"));
    cmd.args(["--config", cfg_path.to_str().unwrap(), "list-templates"]);

    cmd.assert()
        .code(1)
        .stdout(predicates::str::contains("FAIL docfill list-templates"));
}

#[test]
fn list_templates_skips_directory_with_two_documents() {
    let tmp = tempdir().unwrap();
    let tpl_root = tmp.path().join("templates");
    template_tree(&tpl_root);
    write(&tpl_root.join("twice").join("schema.yaml"), SCHEMA);
    write(&tpl_root.join("twice").join("a.md"), "a");
    write(&tpl_root.join("twice").join("b.txt"), "b");
    let cfg_path = tmp.path().join("config.toml");
    write_config(&cfg_path, &tpl_root, false);

    let mut cmd = std::process::Command::new(assert_cmd::cargo::cargo_bin!("docfill"));
    cmd.args(["--config", cfg_path.to_str().unwrap(), "list-templates"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("-- 2 templates --"))
        .stdout(predicates::str::contains("skipped: twice"));

    let mut cmd = std::process::Command::new(assert_cmd::cargo::cargo_bin!("docfill"));
    cmd.args(["--config", cfg_path.to_str().unwrap(), "check", "twice"]);
    cmd.assert()
        .code(1)
        .stdout(predicates::str::contains("FAIL docfill check"))
        .stdout(predicates::str::contains("several document files: a.md, b.txt"));
}
