// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::fs;

use tempfile::TempDir;

use super::*;
use crate::test_utils::{create_tree, temp_project};

#[test]
fn finds_config_in_start_dir() {
    let dir = temp_project();
    assert_eq!(
        find_config(dir.path()),
        Some(dir.path().join("slowmark.toml"))
    );
}

#[test]
fn finds_config_in_parent() {
    let dir = temp_project();
    create_tree(dir.path(), &[("nested/deeper/.keep", "")]);
    let found = find_config(&dir.path().join("nested/deeper")).unwrap();
    assert_eq!(found, dir.path().join("slowmark.toml"));
}

#[test]
fn stops_at_git_root() {
    let dir = temp_project();
    fs::create_dir_all(dir.path().join("repo/.git")).unwrap();
    fs::create_dir_all(dir.path().join("repo/src")).unwrap();
    assert!(find_config(&dir.path().join("repo/src")).is_none());
}

#[test]
fn config_at_git_root_is_found() {
    let dir = TempDir::new().unwrap();
    create_tree(
        dir.path(),
        &[("repo/slowmark.toml", "version = 1\n"), ("repo/.git/HEAD", "")],
    );
    assert_eq!(
        find_config(&dir.path().join("repo")),
        Some(dir.path().join("repo/slowmark.toml"))
    );
}

#[test]
fn directory_named_like_config_is_ignored() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("slowmark.toml")).unwrap();
    fs::create_dir_all(dir.path().join(".git")).unwrap();
    assert!(find_config(dir.path()).is_none());
}
