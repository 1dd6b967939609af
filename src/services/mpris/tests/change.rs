use crate::services::mpris::{ChangeGate, protocol::parse_metadata_line};

use super::support::line;

#[test]
fn position_only_changes_are_suppressed() {
    let mut gate = ChangeGate::default();
    let first = parse_metadata_line(&line("Song A", "Playing", "spotify", 1_000_000)).unwrap();
    let second = parse_metadata_line(&line("Song A", "Playing", "spotify", 2_000_000)).unwrap();

    assert!(gate.admit(&first));
    assert!(!gate.admit(&second));
    assert_eq!(gate.last().and_then(|last| last.position), Some(1_000_000));
}

#[test]
fn title_change_is_admitted() {
    let mut gate = ChangeGate::default();
    let first = parse_metadata_line(&line("Song A", "Playing", "spotify", 0)).unwrap();
    let second = parse_metadata_line(&line("Song B", "Playing", "spotify", 0)).unwrap();

    assert!(gate.admit(&first));
    assert!(gate.admit(&second));
    assert_eq!(gate.last().map(|last| last.title.as_str()), Some("Song B"));
}

#[test]
fn status_change_is_admitted() {
    let mut gate = ChangeGate::default();
    let playing = parse_metadata_line(&line("Song A", "Playing", "spotify", 0)).unwrap();
    let paused = parse_metadata_line(&line("Song A", "Paused", "spotify", 0)).unwrap();

    assert!(gate.admit(&playing));
    assert!(gate.admit(&paused));
}

#[test]
fn reset_admits_repeat() {
    let mut gate = ChangeGate::default();
    let record = parse_metadata_line(&line("Song A", "Playing", "spotify", 0)).unwrap();

    assert!(gate.admit(&record));
    gate.reset();
    assert!(gate.admit(&record));
}
