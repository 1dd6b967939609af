//! Unit tests for config module
//!
//! Tests configuration types, defaults, and validation.
//! No filesystem dependencies - all in-memory.

#![allow(clippy::panic, clippy::unwrap_used)]

use std::time::Duration;

use crate::{
    config::{Config, LogLevel, MediaConfig},
    core::AppError,
};

#[test]
fn defaults_match_documented_cadences() {
    let media = MediaConfig::default();

    assert_eq!(media.binary, "playerctl");
    assert!(media.ignored_players.is_empty());
    assert_eq!(media.roster_interval_ms, 5000);
    assert_eq!(media.volume_interval_ms, 2000);
    assert_eq!(media.metadata_interval_ms, 3000);
    assert_eq!(media.restart_delay_ms, 2000);
    assert_eq!(media.max_restart_attempts, 5);
    assert_eq!(media.settle_delay_ms, 100);
    assert_eq!(media.art_server, "127.0.0.1:0");
}

#[test]
fn engine_settings_convert_milliseconds() {
    let media = MediaConfig {
        roster_interval_ms: 1500,
        settle_delay_ms: 0,
        max_restart_attempts: 2,
        ..MediaConfig::default()
    };

    let settings = media.engine_settings();

    assert_eq!(settings.roster_interval, Duration::from_millis(1500));
    assert_eq!(settings.volume_interval, Duration::from_secs(2));
    assert_eq!(settings.metadata_interval, Duration::from_secs(3));
    assert_eq!(settings.settle_delay, Duration::ZERO);
    assert_eq!(settings.stream.max_restart_attempts, 2);
    assert_eq!(settings.stream.restart_delay, Duration::from_secs(2));
}

#[test]
fn empty_toml_is_default() {
    let config = Config::from_toml_str("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn partial_section_keeps_other_defaults() {
    let config = Config::from_toml_str(
        r#"
        [general]
        log_level = "debug"

        [media]
        binary = "/usr/local/bin/playerctl"
        ignored_players = ["chromium", "kdeconnect"]
        "#,
    )
    .unwrap();

    assert_eq!(config.general.log_level, LogLevel::Debug);
    assert_eq!(config.media.binary, "/usr/local/bin/playerctl");
    assert_eq!(config.media.ignored_players, vec!["chromium", "kdeconnect"]);
    assert_eq!(config.media.roster_interval_ms, 5000);
}

#[test]
fn zero_interval_is_rejected() {
    let result = Config::from_toml_str(
        r#"
        [media]
        volume_interval_ms = 0
        "#,
    );

    match result {
        Err(AppError::ConfigValidation { component, details }) => {
            assert_eq!(component, "media");
            assert!(details.contains("volume_interval_ms"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn blank_binary_is_rejected() {
    let media = MediaConfig {
        binary: "  ".to_string(),
        ..MediaConfig::default()
    };

    assert!(matches!(
        media.validate(),
        Err(AppError::InvalidConfigField { field, .. }) if field == "binary"
    ));
}

#[test]
fn bad_art_server_address_is_rejected() {
    let media = MediaConfig {
        art_server: "localhost".to_string(),
        ..MediaConfig::default()
    };

    assert!(matches!(
        media.art_server_addr(),
        Err(AppError::InvalidConfigField { field, .. }) if field == "art_server"
    ));
}

#[test]
fn unknown_log_level_is_a_parse_error() {
    let result = Config::from_toml_str(
        r#"
        [general]
        log_level = "loud"
        "#,
    );

    match result {
        Err(AppError::TomlParseError { location, .. }) => assert_eq!(location, "string"),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn serialized_config_parses_back() {
    let original = Config {
        media: MediaConfig {
            ignored_players: vec!["firefox".to_string()],
            ..MediaConfig::default()
        },
        ..Config::default()
    };

    let text = original.to_toml_string().unwrap();
    assert!(text.contains("[general]"));
    assert!(text.contains("[media]"));

    assert_eq!(Config::from_toml_str(&text).unwrap(), original);
}

#[test]
fn log_level_directives() {
    assert_eq!(LogLevel::default(), LogLevel::Info);
    assert_eq!(LogLevel::Warn.as_directive(), "warn");
    assert_eq!(LogLevel::Trace.to_string(), "trace");
}
