//! Tests for configuration resolution priority
//!
//! Env-touching tests run serially; the process environment is shared.

use redline_common::config::{
    resolve_root_folder, resolve_source_location, DEFAULT_SOURCE_LOCATION,
};
use serial_test::serial;
use std::path::{Path, PathBuf};

#[test]
#[serial]
fn test_source_cli_arg_beats_env() {
    std::env::set_var("REDLINE_SOURCE", "/from/env.csv");

    let resolved = resolve_source_location(Some(Path::new("/from/cli.csv")));
    assert_eq!(resolved, PathBuf::from("/from/cli.csv"));

    std::env::remove_var("REDLINE_SOURCE");
}

#[test]
#[serial]
fn test_source_env_used_without_cli_arg() {
    std::env::set_var("REDLINE_SOURCE", "/from/env.csv");

    let resolved = resolve_source_location(None);
    assert_eq!(resolved, PathBuf::from("/from/env.csv"));

    std::env::remove_var("REDLINE_SOURCE");
}

#[test]
#[serial]
fn test_source_falls_back_to_bundled_default() {
    std::env::remove_var("REDLINE_SOURCE");

    let resolved = resolve_source_location(None);
    assert_eq!(resolved, PathBuf::from(DEFAULT_SOURCE_LOCATION));
}

#[test]
#[serial]
fn test_root_folder_cli_arg_beats_env() {
    std::env::set_var("REDLINE_ROOT", "/from/env");

    let resolved = resolve_root_folder(Some(Path::new("/from/cli")));
    assert_eq!(resolved, PathBuf::from("/from/cli"));

    std::env::remove_var("REDLINE_ROOT");
}

#[test]
#[serial]
fn test_root_folder_env_used_without_cli_arg() {
    std::env::set_var("REDLINE_ROOT", "/from/env");

    let resolved = resolve_root_folder(None);
    assert_eq!(resolved, PathBuf::from("/from/env"));

    std::env::remove_var("REDLINE_ROOT");
}
