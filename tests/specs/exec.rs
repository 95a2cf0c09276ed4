//! Behavioral specs for `slowmark exec`.

use crate::prelude::*;

#[test]
fn exec_passes_through_output_and_exit() {
    let temp = Project::empty();

    temp.cmd(&["exec", "--", "echo", "hi"])
        .assert()
        .success()
        .stdout(predicates::str::contains("hi"))
        .stdout(predicates::str::contains("Please consider").not());
}

#[test]
fn exec_flags_slow_command() {
    let temp = Project::empty();

    temp.cmd(&["exec", "--name", "nap", "--threshold-ms", "50", "--", "sleep", "0.2"])
        .assert()
        .success()
        .stdout(predicates::str::ends_with(
            "Please consider marking operation [nap] as expected-slow.\n",
        ));
}

#[test]
fn exec_expected_slow_is_not_flagged() {
    let temp = Project::empty();

    temp.cmd(&["exec", "--threshold-ms", "-1", "--expected-slow", "--", "true"])
        .assert()
        .success()
        .stdout(predicates::str::is_empty());
}

#[test]
fn exec_default_name_is_the_command_line() {
    let temp = Project::empty();

    temp.cmd(&["exec", "--threshold-ms", "0", "--", "true"])
        .assert()
        .success()
        .stdout("Please consider marking operation [true] as expected-slow.\n");
}

#[test]
fn exec_failure_exits_one() {
    let temp = Project::empty();

    temp.cmd(&["exec", "--", "false"]).assert().code(1);
}

#[test]
fn exec_timeout_exits_one() {
    let temp = Project::empty();

    temp.cmd(&["exec", "--timeout-ms", "100", "--", "sleep", "5"])
        .assert()
        .code(1)
        .stderr(predicates::str::contains("timed out"));
}

#[test]
fn exec_missing_program_is_an_error() {
    let temp = Project::empty();

    temp.cmd(&["exec", "--", "definitely-not-a-real-program-xyz"])
        .assert()
        .code(2)
        .stderr(predicates::str::contains("failed to spawn"));
}
