//! Integration tests for loading configuration files.

#![allow(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic))]

use std::{fs, path::PathBuf};

use mpris_sync::{
    AppError,
    config::{Config, ConfigPaths, LogLevel},
};
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();

    let config = Config::load(&dir.path().join("absent.toml")).unwrap();

    assert_eq!(config, Config::default());
}

#[test]
fn loads_all_media_fields() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        [general]
        log_level = "warn"

        [media]
        binary = "playerctl-git"
        ignored_players = ["kdeconnect"]
        roster_interval_ms = 10000
        volume_interval_ms = 1000
        metadata_interval_ms = 4000
        restart_delay_ms = 500
        max_restart_attempts = 3
        settle_delay_ms = 50
        art_server = "127.0.0.1:8731"
        "#,
    );

    let config = Config::load(&path).unwrap();

    assert_eq!(config.general.log_level, LogLevel::Warn);
    let media = &config.media;
    assert_eq!(media.binary, "playerctl-git");
    assert_eq!(media.ignored_players, vec!["kdeconnect"]);
    assert_eq!(media.roster_interval_ms, 10000);
    assert_eq!(media.max_restart_attempts, 3);
    assert_eq!(media.art_server_addr().unwrap().port(), 8731);
}

#[test]
fn malformed_file_reports_its_location() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[media\nbinary = ");

    match Config::load(&path) {
        Err(AppError::TomlParseError { location, .. }) => {
            assert!(location.ends_with("config.toml"));
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn invalid_values_fail_validation() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[media]\nroster_interval_ms = 0\n");

    assert!(matches!(
        Config::load(&path),
        Err(AppError::ConfigValidation { .. })
    ));
}

#[test]
fn unreadable_path_is_an_io_error() {
    let dir = TempDir::new().unwrap();

    assert!(matches!(
        Config::load(dir.path()),
        Err(AppError::IoError { .. })
    ));
}

#[test]
fn written_config_loads_back() {
    let dir = TempDir::new().unwrap();
    let mut original = Config::default();
    original.media.ignored_players = vec!["firefox".to_string()];
    original.general.log_level = LogLevel::Debug;

    let path = write_config(&dir, &original.to_toml_string().unwrap());

    assert_eq!(Config::load(&path).unwrap(), original);
}

#[test]
fn config_location_follows_xdg() {
    let dir = TempDir::new().unwrap();

    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", dir.path());
    }

    assert_eq!(
        ConfigPaths::main_config().unwrap(),
        dir.path().join("mpris-sync").join("config.toml")
    );
}
