use std::sync::Arc;

use crate::services::mpris::{
    Installation, LoopMode, MetadataQuery, PlaybackControl, PlayerId, PlayerctlClient,
    RosterQuery, ShuffleMode, Volume, VolumeControl,
};

use super::support::{FakeRunner, failed, line, ok};

fn client(runner: &Arc<FakeRunner>, ignored: &[&str]) -> PlayerctlClient {
    PlayerctlClient::new(
        runner.clone(),
        "playerctl",
        ignored.iter().map(|prefix| prefix.to_string()).collect(),
    )
}

#[tokio::test]
async fn roster_without_players_is_empty_not_failed() {
    let runner = FakeRunner::new();
    runner.respond("--list-all", failed("No players found"));

    let players = client(&runner, &[]).list_players().await;

    assert_eq!(players, Some(Vec::new()));
}

#[tokio::test]
async fn roster_failure_is_none() {
    let runner = FakeRunner::new();
    runner.respond("--list-all", failed("Could not connect to bus"));

    assert_eq!(client(&runner, &[]).list_players().await, None);
}

#[tokio::test]
async fn roster_hides_ignored_prefixes() {
    let runner = FakeRunner::new();
    runner.roster(&["spotify", "kdeconnect.mpris_1", "firefox.instance3"]);

    let players = client(&runner, &["kdeconnect"]).list_players().await;

    assert_eq!(
        players,
        Some(vec![
            PlayerId::from("spotify"),
            PlayerId::from("firefox.instance3"),
        ])
    );
}

#[tokio::test]
async fn metadata_targets_player_and_skips_blank_lines() {
    let runner = FakeRunner::new();
    let spotify = PlayerId::from("spotify");
    runner.respond_for(
        "spotify",
        "metadata",
        ok(&format!("\n{}\n", line("Song A", "Playing", "spotify", 0))),
    );

    let media = client(&runner, &[]).metadata(Some(&spotify)).await.unwrap();

    assert_eq!(media.title, "Song A");
    let calls = runner.calls_to("metadata");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0.as_deref(), Some("spotify"));
}

#[tokio::test]
async fn unparseable_metadata_is_none() {
    let runner = FakeRunner::new();
    runner.respond("metadata", ok("only;;;three;;;fields"));

    assert_eq!(client(&runner, &[]).metadata(None).await, None);
}

#[tokio::test]
async fn settings_queries() {
    let runner = FakeRunner::new();
    runner.respond("volume", ok("0.42\n"));
    runner.respond("shuffle", ok("On\n"));
    runner.respond("loop", ok("Track\n"));
    let client = client(&runner, &[]);

    assert_eq!(client.volume(None).await, Volume::try_from_percent(42).ok());
    assert_eq!(client.shuffle(None).await, Some(ShuffleMode::On));
    assert_eq!(client.loop_mode(None).await, Some(LoopMode::Track));
}

#[tokio::test]
async fn failed_query_is_none() {
    let runner = FakeRunner::new();
    runner.respond("volume", failed("No player could handle this command"));

    assert_eq!(client(&runner, &[]).volume(None).await, None);
}

#[tokio::test]
async fn verbs_report_exit_status() {
    let runner = FakeRunner::new();
    runner.respond("next", failed("Player does not support next"));
    let client = client(&runner, &[]);

    assert!(client.play(None).await);
    assert!(!client.next(None).await);
}

#[tokio::test]
async fn unknown_modes_are_not_sent() {
    let runner = FakeRunner::new();
    let client = client(&runner, &[]);

    assert!(!client.set_shuffle(None, ShuffleMode::Unknown).await);
    assert!(!client.set_loop(None, LoopMode::Unknown).await);
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn installation_probe() {
    let runner = FakeRunner::new();
    runner.respond("--version", ok("v2.4.1\n"));
    let client = client(&runner, &[]);

    assert!(client.is_installed().await);
    assert_eq!(client.version().await.as_deref(), Some("v2.4.1"));
    assert_eq!(client.binary(), "playerctl");

    runner.set_installed(false);
    assert!(!client.is_installed().await);
}
