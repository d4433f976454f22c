//! Configuration loading tests
//!
//! Covers file loading, env override priority and validation.
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate LFETCH_* variables are marked with #[serial].

use lyricfetch_common::config::{Config, ENV_PREFIX};
use lyricfetch_common::Error;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

fn clear_env() {
    for key in ["JOBCOUNT", "OVERWRITE", "DEBUG", "PRINT_STATS", "LASTFM_KEY", "SOURCES", "EXCLUDE", "DEBUG_DIR"] {
        env::remove_var(format!("{}{}", ENV_PREFIX, key));
    }
}

#[test]
#[serial]
fn test_load_explicit_file() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "jobcount = 6\noverwrite = true\nlastfm_key = \"k\"\nexclude = [\"letras\"]\n",
    )
    .unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.jobcount, 6);
    assert!(config.overwrite);
    assert_eq!(config.lastfm_key, "k");
    assert_eq!(config.exclude, vec!["letras"]);
}

#[test]
#[serial]
fn test_env_wins_over_file() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "jobcount = 6\n").unwrap();

    env::set_var("LFETCH_JOBCOUNT", "2");
    let config = Config::load(Some(&path)).unwrap();
    clear_env();

    assert_eq!(config.jobcount, 2);
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let result = Config::load(Some(&dir.path().join("nope.toml")));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_malformed_file_is_an_error() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "jobcount = \"not a number\"\n").unwrap();

    assert!(matches!(Config::load(Some(&path)), Err(Error::Toml(_))));
}

#[test]
#[serial]
fn test_zero_jobs_loaded_then_rejected() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "jobcount = 3\n").unwrap();

    env::set_var("LFETCH_JOBCOUNT", "0");
    let config = Config::load(Some(&path));
    clear_env();

    let config = config.unwrap();
    assert_eq!(config.jobcount, 0);
    assert!(matches!(config.validate(), Err(Error::Config(_))));
}
