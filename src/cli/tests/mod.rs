//! Unit tests for the CLI
//!
//! Media commands run against the scripted control program fake.

#![allow(clippy::panic, clippy::unwrap_used)]

use std::{path::PathBuf, sync::Arc, time::Duration};

use super::{
    CliContext, CliError, CliService, EngineFactory,
    commands::media::{
        SeekCommand, SeekTarget,
        utils::{find_player_by_identifier, split_mode_and_player},
    },
    formatting::{format_micros, format_player_list, format_status, snapshot_json_line},
};
use crate::{
    config::Config,
    services::mpris::{
        PlayerId, StateSnapshot,
        tests::support::{FakeArtServer, FakeRunner, engine, line, ok},
    },
};

fn runner_with(players: &[&str]) -> Arc<FakeRunner> {
    let runner = FakeRunner::new();
    runner.roster(players);
    runner.respond("volume", ok("0.5"));
    runner.respond("shuffle", ok("Off"));
    runner.respond("loop", ok("None"));
    runner.respond("status", ok("Paused"));
    for player in players {
        runner.respond_for(
            player,
            "metadata",
            ok(&line(&format!("{player} song"), "Paused", player, 0)),
        );
    }
    runner
}

fn service(runner: &Arc<FakeRunner>) -> CliService {
    let runner = runner.clone();
    let factory: EngineFactory = Arc::new(move || Ok(engine(&runner, &FakeArtServer::new())));
    let context = CliContext::with_engine_factory(
        Config::default(),
        PathBuf::from("/nonexistent/mpris-sync/config.toml"),
        factory,
    );
    CliService::new(&context)
}

async fn run(
    service: &CliService,
    category: &str,
    command: &str,
    args: &[&str],
) -> Result<String, CliError> {
    let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
    service.execute_command(category, command, &args).await
}

fn players(names: &[&str]) -> Vec<PlayerId> {
    names.iter().map(|name| PlayerId::from(*name)).collect()
}

#[test]
fn player_lookup_by_index() {
    let roster = players(&["spotify", "vlc"]);

    assert_eq!(find_player_by_identifier(&roster, "2").unwrap().as_str(), "vlc");
    assert!(matches!(
        find_player_by_identifier(&roster, "0"),
        Err(CliError::InvalidArgument { .. })
    ));
    assert!(matches!(
        find_player_by_identifier(&roster, "3"),
        Err(CliError::InvalidArgument { .. })
    ));
}

#[test]
fn player_lookup_by_prefix() {
    let roster = players(&["Spotify", "chromium.instance1", "chromium.instance2"]);

    assert_eq!(find_player_by_identifier(&roster, "spot").unwrap().as_str(), "Spotify");
    assert_eq!(
        find_player_by_identifier(&roster, "chromium.instance2").unwrap().as_str(),
        "chromium.instance2"
    );

    match find_player_by_identifier(&roster, "chromium") {
        Err(CliError::InvalidArgument { reason, .. }) => assert!(reason.contains("Multiple")),
        other => panic!("expected ambiguity, got {other:?}"),
    }
    assert!(find_player_by_identifier(&roster, "mpv").is_err());
    assert!(find_player_by_identifier(&[], "1").is_err());
}

#[test]
fn mode_and_player_split() {
    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }
    let parse = |value: &str| (value == "on").then_some(true);

    let none = args(&[]);
    assert_eq!(split_mode_and_player(&none, "mode", parse).unwrap(), (None, None));

    let mode_only = args(&["on"]);
    assert_eq!(split_mode_and_player(&mode_only, "mode", parse).unwrap(), (Some(true), None));

    let player_only = args(&["vlc"]);
    let (mode, player) = split_mode_and_player(&player_only, "mode", parse).unwrap();
    assert_eq!(mode, None);
    assert_eq!(player.map(String::as_str), Some("vlc"));

    let bad = args(&["loud", "vlc"]);
    assert!(matches!(
        split_mode_and_player(&bad, "mode", parse),
        Err(CliError::InvalidArgument { .. })
    ));
}

#[test]
fn seek_positions() {
    assert_eq!(
        SeekCommand::parse_position("90").unwrap(),
        SeekTarget::To(Duration::from_secs(90))
    );
    assert_eq!(
        SeekCommand::parse_position("1:30").unwrap(),
        SeekTarget::To(Duration::from_secs(90))
    );
    assert_eq!(SeekCommand::parse_position("+10").unwrap(), SeekTarget::By(10.0));
    assert_eq!(SeekCommand::parse_position("-2.5").unwrap(), SeekTarget::By(-2.5));
    assert_eq!(SeekCommand::parse_position("25%").unwrap(), SeekTarget::Fraction(0.25));

    for bad in ["1:75", "150%", "abc", "+x", "-inf", "1:2:3"] {
        assert!(SeekCommand::parse_position(bad).is_err(), "{bad} accepted");
    }
}

#[test]
fn micros_render_as_clock_time() {
    assert_eq!(format_micros(0), "0:00");
    assert_eq!(format_micros(65_000_000), "1:05");
    assert_eq!(format_micros(3_725_000_000), "1:02:05");
}

#[test]
fn status_without_player() {
    let snapshot = StateSnapshot::initial().with_error(Some("No active media player".to_string()));

    assert_eq!(
        format_status(&snapshot),
        "No player selected\nNo active media player"
    );
    assert_eq!(format_player_list(&snapshot), "No media players found");
}

#[test]
fn json_line_is_single_line() {
    let snapshot = StateSnapshot::initial().with_players(players(&["spotify"]));
    let json = snapshot_json_line(&snapshot).unwrap();

    assert!(!json.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["players"][0], "spotify");
    assert_eq!(value["is_loading"], true);
}

#[tokio::test]
async fn help_lists_categories_and_commands() {
    let service = service(&runner_with(&[]));

    let general = run(&service, "help", "", &[]).await.unwrap();
    assert!(general.contains("media"));
    assert!(general.contains("config"));

    let media = run(&service, "help", "media", &[]).await.unwrap();
    for command in ["play-pause", "volume", "watch", "switch", "seek"] {
        assert!(media.contains(command), "{command} missing from help");
    }

    let categories = service.list_all();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].0, "config");
    assert_eq!(categories[1].1.len(), 14);
}

#[tokio::test]
async fn unknown_commands_are_reported() {
    let service = service(&runner_with(&[]));

    assert!(matches!(
        run(&service, "audio", "mute", &[]).await,
        Err(CliError::CommandNotFound(_))
    ));
    assert!(matches!(
        run(&service, "media", "rewind", &[]).await,
        Err(CliError::CommandNotFound(_))
    ));
}

#[tokio::test]
async fn argument_count_is_checked_before_running() {
    let runner = runner_with(&["spotify"]);
    let service = service(&runner);

    assert!(matches!(
        run(&service, "media", "list", &["extra"]).await,
        Err(CliError::InvalidArguments(_))
    ));
    assert!(matches!(
        run(&service, "media", "volume", &[]).await,
        Err(CliError::InvalidArguments(_))
    ));
    assert!(runner.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn status_shows_selected_media() {
    let service = service(&runner_with(&["spotify", "vlc"]));

    let output = run(&service, "media", "status", &[]).await.unwrap();

    assert!(output.contains("Player:   spotify"));
    assert!(output.contains("Title:    spotify song"));
    assert!(output.contains("Position: 0:00 / 3:00"));
    assert!(output.contains("Volume:   50%"));
    assert!(output.contains("Shuffle:  off"));
}

#[tokio::test(start_paused = true)]
async fn list_marks_selection() {
    let service = service(&runner_with(&["spotify", "vlc"]));

    let output = run(&service, "media", "list", &[]).await.unwrap();

    assert!(output.contains("Found 2 media player(s)"));
    assert!(output.contains(" 1. spotify"));
    assert!(output.contains(" 2. vlc"));
    assert!(output.contains("(selected)"));
}

#[tokio::test(start_paused = true)]
async fn play_targets_selected_player() {
    let runner = runner_with(&["spotify", "vlc"]);
    let service = service(&runner);

    let output = run(&service, "media", "play", &[]).await.unwrap();

    assert_eq!(output, "Sent play to spotify");
    let plays = runner.calls_to("play");
    assert_eq!(plays.len(), 1);
    assert_eq!(plays[0].0.as_deref(), Some("spotify"));
}

#[tokio::test(start_paused = true)]
async fn play_with_player_switches_first() {
    let runner = runner_with(&["spotify", "vlc"]);
    runner.respond_for("spotify", "status", ok("Playing"));
    let service = service(&runner);

    let output = run(&service, "media", "play", &["vlc"]).await.unwrap();

    assert_eq!(output, "Sent play to vlc");
    assert_eq!(runner.calls_to("play")[0].0.as_deref(), Some("vlc"));
    assert!(
        runner
            .calls_to("pause")
            .iter()
            .any(|(player, _)| player.as_deref() == Some("spotify"))
    );
}

#[tokio::test(start_paused = true)]
async fn switch_reports_new_media() {
    let service = service(&runner_with(&["spotify", "vlc"]));

    let output = run(&service, "media", "switch", &["2"]).await.unwrap();

    assert!(output.starts_with("Switched to vlc"));
    assert!(output.contains("Title:    vlc song"));
}

#[tokio::test(start_paused = true)]
async fn volume_is_validated() {
    let runner = runner_with(&["spotify"]);
    let service = service(&runner);

    assert!(matches!(
        run(&service, "media", "volume", &["loud"]).await,
        Err(CliError::InvalidArgument { .. })
    ));
    assert!(runner.calls().is_empty());

    match run(&service, "media", "volume", &["150"]).await {
        Err(CliError::InvalidArgument { arg, .. }) => assert_eq!(arg, "percent"),
        other => panic!("expected invalid percent, got {other:?}"),
    }

    let output = run(&service, "media", "volume", &["40%"]).await.unwrap();
    assert_eq!(output, "Set volume of spotify to 40%");
    assert!(
        runner
            .calls_to("volume")
            .iter()
            .any(|(_, args)| args.last().map(String::as_str) == Some("0.4"))
    );
}

#[tokio::test(start_paused = true)]
async fn seek_variants_reach_the_player() {
    let runner = runner_with(&["spotify"]);
    let service = service(&runner);

    run(&service, "media", "seek", &["1:30"]).await.unwrap();
    run(&service, "media", "seek", &["50%"]).await.unwrap();
    run(&service, "media", "seek", &["+10"]).await.unwrap();

    let positions: Vec<String> = runner
        .calls_to("position")
        .into_iter()
        .filter_map(|(_, args)| args.last().cloned())
        .collect();
    assert_eq!(positions, vec!["90.0", "90.0", "+10"]);
}

#[tokio::test(start_paused = true)]
async fn loop_and_shuffle_modes() {
    let runner = runner_with(&["spotify"]);
    let service = service(&runner);

    let output = run(&service, "media", "loop", &["track"]).await.unwrap();
    assert_eq!(output, "Loop mode track for spotify");

    let output = run(&service, "media", "shuffle", &["on"]).await.unwrap();
    assert_eq!(output, "Shuffle on for spotify");

    let output = run(&service, "media", "shuffle", &[]).await.unwrap();
    assert_eq!(output, "Shuffle on for spotify");

    assert!(matches!(
        run(&service, "media", "loop", &["sideways", "spotify"]).await,
        Err(CliError::InvalidArgument { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn no_players_is_a_service_error() {
    let service = service(&runner_with(&[]));

    match run(&service, "media", "next", &[]).await {
        Err(CliError::ServiceError { details, .. }) => {
            assert_eq!(details, "No active media player");
        }
        other => panic!("expected service error, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn missing_program_fails_media_commands() {
    let runner = runner_with(&["spotify"]);
    runner.set_installed(false);
    let service = service(&runner);

    match run(&service, "media", "status", &[]).await {
        Err(CliError::ServiceError { details, .. }) => {
            assert!(details.contains("playerctl is not installed"));
        }
        other => panic!("expected service error, got {other:?}"),
    }
}

#[tokio::test]
async fn config_commands() {
    let service = service(&runner_with(&[]));

    let shown = run(&service, "config", "show", &[]).await.unwrap();
    assert!(shown.contains("[media]"));
    assert!(shown.contains("binary = \"playerctl\""));

    let schema = run(&service, "config", "schema", &[]).await.unwrap();
    let schema: serde_json::Value = serde_json::from_str(&schema).unwrap();
    assert!(schema["properties"].get("media").is_some());

    let path = run(&service, "config", "path", &[]).await.unwrap();
    assert!(path.ends_with("(not created, defaults in use)"));
}
