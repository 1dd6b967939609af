//! Matching reported player names against the selected roster identifier.
//!
//! The roster lists instance-qualified names (`firefox.instance7723`) but
//! metadata payloads carry the base name (`firefox`). Both directions of
//! qualification must match, otherwise updates for the selected player are
//! dropped and the display stops updating.

/// Whether `reported` refers to the same player as `selected`.
///
/// An empty selection matches everything. Otherwise the names must be equal,
/// or one must be the other followed by `.` and a non-empty instance suffix.
pub fn is_same_logical_player(reported: &str, selected: &str) -> bool {
    if selected.is_empty() {
        return true;
    }

    if reported == selected {
        return true;
    }

    is_instance_of(selected, reported) || is_instance_of(reported, selected)
}

fn is_instance_of(qualified: &str, base: &str) -> bool {
    if base.is_empty() {
        return false;
    }

    qualified
        .strip_prefix(base)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|suffix| !suffix.is_empty())
}
