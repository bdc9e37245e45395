//! Tests for paths module.

use super::*;
use serial_test::serial;
use std::env;
use tempfile::tempdir;

#[test]
fn test_default_config_path_layout() {
    let path = default_config_path().unwrap();
    assert!(path.ends_with(".claude-usage-status/config.yaml"));
    assert_eq!(path.parent(), Some(app_home_dir().unwrap().as_path()));
}

#[test]
#[serial]
fn test_credentials_path_honours_claude_config_dir() {
    let dir = tempdir().unwrap();
    env::set_var(CLAUDE_CONFIG_DIR_ENV, dir.path());
    let path = claude_credentials_path();
    env::remove_var(CLAUDE_CONFIG_DIR_ENV);

    assert_eq!(path, Some(dir.path().join(".credentials.json")));
}

#[test]
#[serial]
fn test_credentials_path_defaults_to_home_claude_dir() {
    env::remove_var(CLAUDE_CONFIG_DIR_ENV);
    let path = claude_credentials_path().unwrap();
    assert!(path.ends_with(".claude/.credentials.json"));
}

#[test]
#[serial]
fn test_empty_claude_config_dir_is_ignored() {
    env::set_var(CLAUDE_CONFIG_DIR_ENV, "");
    let path = claude_credentials_path();
    env::remove_var(CLAUDE_CONFIG_DIR_ENV);

    assert!(path.unwrap().ends_with(".claude/.credentials.json"));
}
