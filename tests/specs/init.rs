//! Behavioral specs for `slowmark init`.

use crate::prelude::*;

#[test]
fn init_creates_config_in_current_directory() {
    let temp = Project::empty();

    temp.cmd(&["init"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Created"));

    let content = std::fs::read_to_string(temp.path().join("slowmark.toml")).unwrap();
    assert!(content.starts_with("version = 1"));
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let temp = Project::with_config("version = 1\n# existing\n");

    temp.cmd(&["init"])
        .assert()
        .code(2)
        .stderr(predicates::str::contains("already exists"))
        .stderr(predicates::str::contains("--force"));

    let content = std::fs::read_to_string(temp.path().join("slowmark.toml")).unwrap();
    assert!(content.contains("# existing"));
}

#[test]
fn init_force_overwrites_existing_config() {
    let temp = Project::with_config("version = 1\n# existing\n");

    temp.cmd(&["init", "--force"]).assert().success();

    let content = std::fs::read_to_string(temp.path().join("slowmark.toml")).unwrap();
    assert!(!content.contains("# existing"));
    assert!(content.contains("[[operation]]"));
}

#[test]
fn init_output_is_runnable() {
    let temp = Project::empty();
    temp.cmd(&["init"]).assert().success();

    temp.cmd(&["run", "--no-color"])
        .assert()
        .success()
        .stdout(predicates::str::contains("PASS  example"));
}
