use std::sync::atomic::{AtomicBool, Ordering};

use tokio::time;
use tracing::{debug, info, instrument, warn};

use super::SyncEngine;
use crate::services::mpris::{LoopMode, MediaError, PlayerId, ShuffleMode};

/// What a roster refresh did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Another refresh was already running
    Skipped,
    /// The roster could not be listed; state kept
    Failed,
    /// No players left; selection and media cleared
    Cleared,
    /// Selection still present
    Unchanged,
    /// A new player was selected and its tasks rebuilt
    Reconnected(PlayerId),
}

struct RefreshGuard<'a>(&'a AtomicBool);

impl<'a> RefreshGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SyncEngine {
    /// List players and make sure the selection is one of them.
    ///
    /// At most one refresh runs at a time; a call that arrives while another
    /// is in flight returns [`ReconcileOutcome::Skipped`] without touching
    /// anything.
    #[instrument(parent = &self.inner.span, skip_all)]
    pub async fn refresh_roster_and_reconcile(&self) -> ReconcileOutcome {
        let Some(_guard) = RefreshGuard::acquire(&self.inner.refreshing) else {
            debug!("Roster refresh already in progress");
            return ReconcileOutcome::Skipped;
        };

        let Some(players) = self.inner.backend.list_players().await else {
            warn!("Failed to list players, keeping previous roster");
            return ReconcileOutcome::Failed;
        };

        let previous = self.snapshot().selected_player;

        let Some(first) = players.first().cloned() else {
            if previous.is_some() {
                info!("All players are gone");
            }
            self.update(|state| {
                state
                    .clone()
                    .with_players(Vec::new())
                    .with_selection(None)
                    .with_media(None)
                    .with_error(Some(MediaError::NoActivePlayer.to_string()))
            });
            return ReconcileOutcome::Cleared;
        };

        let still_present = previous
            .as_ref()
            .is_some_and(|selected| players.contains(selected));

        if still_present {
            self.update(|state| state.clone().with_players(players));
            return ReconcileOutcome::Unchanged;
        }

        match &previous {
            Some(selected) => info!(%selected, replacement = %first, "Selected player disappeared"),
            None => info!(player = %first, "Selecting first available player"),
        }

        self.update(|state| {
            state
                .clone()
                .with_players(players)
                .with_selection(Some(first.clone()))
                .with_media(None)
                .with_error(None)
        });
        self.rebind(&first).await;

        ReconcileOutcome::Reconnected(first)
    }

    /// Make `player` the selection and rebuild its stream and timers.
    ///
    /// Returns false, and records a `PlayerNotFound` error, when `player` is
    /// not in the current roster.
    #[instrument(parent = &self.inner.span, skip(self), fields(%player))]
    pub async fn switch_player(&self, player: &PlayerId) -> bool {
        if !self.snapshot().players.contains(player) {
            let error = MediaError::PlayerNotFound(player.clone());
            warn!(%error, "Cannot switch player");
            self.update(|state| state.clone().with_error(Some(error.to_string())));
            return false;
        }

        info!("Switching player");
        self.update(|state| {
            state
                .clone()
                .with_selection(Some(player.clone()))
                .with_media(None)
                .with_loading(true)
                .with_error(None)
        });

        self.rebind(player).await;
        self.update(|state| state.clone().with_loading(false));
        true
    }

    async fn rebind(&self, player: &PlayerId) {
        self.stop_player_tasks();
        time::sleep(self.inner.settings.settle_delay).await;
        self.fetch_player_state(player).await;
        self.start_player_tasks(player);
    }

    async fn fetch_player_state(&self, player: &PlayerId) {
        let backend = &self.inner.backend;
        let target = Some(player);

        let (metadata, volume, shuffle, loop_mode) = tokio::join!(
            backend.metadata(target),
            backend.volume(target),
            backend.shuffle(target),
            backend.loop_mode(target),
        );

        let metadata = match metadata {
            Some(metadata) => Some(self.inner.stream.resolve_art(metadata).await),
            None => None,
        };

        self.update(|state| {
            if state.selected_player.as_ref() != Some(player) {
                return state.clone();
            }

            let mut next = state
                .clone()
                .with_volume(volume.unwrap_or(state.volume))
                .with_shuffle(shuffle.unwrap_or(ShuffleMode::Unknown))
                .with_loop_mode(loop_mode.unwrap_or(LoopMode::Unknown));

            if let Some(metadata) = metadata {
                next = next
                    .with_cached_media(player.clone(), metadata.clone())
                    .with_media(Some(metadata))
                    .with_error(None);
            }
            next
        });
    }
}
