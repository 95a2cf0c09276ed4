//! Behavioral specs for `slowmark run`.

use crate::prelude::*;

const ADVISORY_FAST: &str = "Please consider marking operation [fast] as expected-slow.";

#[test]
fn passing_operations_exit_zero() {
    let temp = Project::with_config(&config_with(10_000, &[("fast", "true")]));

    temp.cmd(&["run"])
        .assert()
        .success()
        .stdout(predicates::str::contains("PASS  fast"))
        .stdout(predicates::str::contains("Please consider").not());
}

#[test]
fn failing_operation_exits_one() {
    let temp = Project::with_config(&config_with(10_000, &[("ok", "true"), ("broken", "exit 3")]));

    temp.cmd(&["run"])
        .assert()
        .code(1)
        .stdout(predicates::str::contains("FAIL  broken"))
        .stdout(predicates::str::contains("exit code 3"));
}

#[test]
fn nonpositive_threshold_flags_every_operation() {
    let temp = Project::with_config(&config_with(-1, &[("fast", "true")]));

    temp.cmd(&["run"])
        .assert()
        .success()
        .stdout(predicates::str::contains(ADVISORY_FAST))
        .stdout(predicates::str::contains("[slow]"));
}

#[test]
fn threshold_flag_overrides_config() {
    let temp = Project::with_config(&config_with(10_000, &[("fast", "true")]));

    temp.cmd(&["run", "--threshold-ms", "0"])
        .assert()
        .success()
        .stdout(predicates::str::contains(ADVISORY_FAST));
}

#[test]
fn slow_operation_over_threshold_is_flagged() {
    let temp = Project::with_config(&config_with(50, &[("sleepy", "sleep 0.3")]));

    temp.cmd(&["run"])
        .assert()
        .success()
        .stdout(predicates::str::contains(
            "Please consider marking operation [sleepy] as expected-slow.",
        ));
}

#[test]
fn exempt_tag_suppresses_advisory() {
    let temp = Project::with_config(
        r#"version = 1

[monitor]
threshold_ms = -1

[[operation]]
name = "fast"
command = "true"
tags = ["slow"]

[[operation]]
name = "marked"
command = "true"
expected_slow = true
"#,
    );

    temp.cmd(&["run"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Please consider").not());
}

#[test]
fn json_output_embeds_advisories() {
    let temp = Project::with_config(&config_with(-1, &[("fast", "true"), ("other", "true")]));

    let output = temp.cmd(&["run", "-o", "json"]).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["summary"]["total"], 2);
    assert_eq!(value["summary"]["flagged"], 2);
    assert_eq!(value["threshold_ms"], serde_json::Value::Null);
    assert_eq!(value["advisories"].as_array().unwrap().len(), 2);
    assert_eq!(value["operations"][0]["name"], "fast");
    assert_eq!(value["operations"][0]["status"], "passed");
}

#[test]
fn disabled_operation_is_skipped() {
    let temp = Project::with_config(
        r#"version = 1

[monitor]
threshold_ms = -1

[[operation]]
name = "off"
command = "exit 1"
disabled = true
disabled_reason = "flaky on CI"
"#,
    );

    temp.cmd(&["run"])
        .assert()
        .success()
        .stdout(predicates::str::contains("SKIP  off: flaky on CI"))
        .stdout(predicates::str::contains("Please consider").not());
}

#[test]
fn env_condition_reads_process_environment() {
    let temp = Project::with_config(
        r#"version = 1

[[operation]]
name = "local-only"
command = "true"
enabled_if_env = { name = "SLOWMARK_TEST_TARGET", matches = "loc.*" }
"#,
    );

    temp.cmd(&["run"])
        .env("SLOWMARK_TEST_TARGET", "local")
        .assert()
        .success()
        .stdout(predicates::str::contains("PASS  local-only"));

    temp.cmd(&["run"])
        .env("SLOWMARK_TEST_TARGET", "ci")
        .assert()
        .success()
        .stdout(predicates::str::contains("SKIP  local-only"));
}

#[test]
fn timeout_kills_operation() {
    let temp = Project::with_config(
        r#"version = 1

[monitor]
threshold_ms = 10000

[[operation]]
name = "hang"
command = "sleep 5"
timeout_ms = 100
"#,
    );

    temp.cmd(&["run"])
        .assert()
        .code(1)
        .stdout(predicates::str::contains("TIME  hang"));
}

#[test]
fn tag_selection_filters_operations() {
    let temp = Project::with_config(
        r#"version = 1

[[operation]]
name = "unit"
command = "true"
tags = ["fast"]

[[operation]]
name = "e2e"
command = "true"
tags = ["browser"]
"#,
    );

    temp.cmd(&["run", "--tag", "fast"])
        .assert()
        .success()
        .stdout(predicates::str::contains("unit"))
        .stdout(predicates::str::contains("e2e").not());
}

#[test]
fn hooks_run_around_operations() {
    let temp = Project::with_config(
        r#"version = 1

[hooks]
before_all = "echo start > log.txt"
before_each = "echo each >> log.txt"
after_all = "echo end >> log.txt"

[[operation]]
name = "a"
command = "true"

[[operation]]
name = "b"
command = "true"
"#,
    );

    temp.cmd(&["run"]).assert().success();

    let log = std::fs::read_to_string(temp.path().join("log.txt")).unwrap();
    assert_eq!(log.lines().collect::<Vec<_>>(), vec!["start", "each", "each", "end"]);
}

#[test]
fn failing_before_all_hook_is_an_error() {
    let temp = Project::with_config(
        r#"version = 1

[hooks]
before_all = "exit 1"

[[operation]]
name = "a"
command = "true"
"#,
    );

    temp.cmd(&["run"])
        .assert()
        .code(2)
        .stderr(predicates::str::contains("before_all hook failed"));
}

#[test]
fn parallel_jobs_report_in_config_order() {
    let temp = Project::with_config(&config_with(
        10_000,
        &[("first", "sleep 0.2"), ("second", "true"), ("third", "true")],
    ));

    let output = temp.cmd(&["run", "--jobs", "3", "-o", "json"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<_> = value["operations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|op| op["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["first", "second", "third"]);
}

#[test]
fn missing_config_is_an_error() {
    let temp = Project::empty();

    temp.cmd(&["run"])
        .assert()
        .code(2)
        .stderr(predicates::str::contains("no slowmark.toml found"));
}

#[test]
fn invalid_config_is_an_error() {
    let temp = Project::with_config("version = 2\n");

    temp.cmd(&["run"])
        .assert()
        .code(2)
        .stderr(predicates::str::contains("unsupported version"));
}

#[test]
fn config_is_discovered_from_subdirectory() {
    let temp = Project::with_config(&config_with(10_000, &[("where", "test -d sub")]));
    temp.file("sub/.keep", "");

    slowmark_cmd()
        .arg("run")
        .current_dir(temp.path().join("sub"))
        .assert()
        .success()
        .stdout(predicates::str::contains("PASS  where"));
}

#[test]
fn explicit_config_flag() {
    let temp = Project::empty();
    temp.file("ci/ops.toml", &config_with(10_000, &[("ok", "true")]));

    temp.cmd(&["run", "-C", "ci/ops.toml"])
        .assert()
        .success()
        .stdout(predicates::str::contains("PASS  ok"));
}
