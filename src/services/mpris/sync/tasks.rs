use std::{future::Future, sync::Arc, time::Duration};

use tokio::{
    sync::broadcast::{self, error::RecvError},
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{Instrument, debug, info, warn};

use super::{ReconcileOutcome, SyncEngine};
use crate::services::mpris::{
    MediaDescriptor, PlayerId, StateSnapshot, StreamEvent, is_same_logical_player,
};

impl SyncEngine {
    pub(super) fn start_roster_timer(&self) {
        if self.is_disposed() {
            return;
        }

        let mut tasks = self.tasks();
        if tasks.roster.is_none() {
            tasks.roster = Some(self.spawn_periodic(
                self.inner.settings.roster_interval,
                |engine| async move { engine.on_roster_tick().await },
            ));
        }
    }

    /// Start the stream subscription and the per-player timers that are not
    /// already running.
    pub(super) fn start_player_tasks(&self, player: &PlayerId) {
        if self.is_disposed() {
            return;
        }

        let mut tasks = self.tasks();
        if tasks.subscription.is_none() {
            let events = self.inner.stream.listen(Some(player.clone()));
            tasks.subscription = Some(self.spawn_subscription(events));
        }
        if tasks.volume.is_none() {
            tasks.volume = Some(self.spawn_periodic(
                self.inner.settings.volume_interval,
                |engine| async move { engine.on_volume_tick().await },
            ));
        }
        if tasks.metadata.is_none() {
            tasks.metadata = Some(self.spawn_periodic(
                self.inner.settings.metadata_interval,
                |engine| async move { engine.on_metadata_tick().await },
            ));
        }
    }

    pub(super) fn stop_player_tasks(&self) {
        self.tasks().abort_player_tasks();
        self.inner.stream.stop_listening();
    }

    /// Run `tick` every `period`, skipping the immediate first tick.
    ///
    /// Ticks run inline, so a slow tick delays the next one instead of
    /// overlapping it.
    fn spawn_periodic<F, Fut>(&self, period: Duration, tick: F) -> JoinHandle<()>
    where
        F: Fn(SyncEngine) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let weak = Arc::downgrade(&self.inner);
        let span = self.inner.span.clone();

        tokio::spawn(
            async move {
                let mut interval = time::interval_at(Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

                loop {
                    interval.tick().await;
                    let Some(inner) = weak.upgrade() else {
                        return;
                    };
                    tick(SyncEngine { inner }).await;
                }
            }
            .instrument(span),
        )
    }

    fn spawn_subscription(&self, mut events: broadcast::Receiver<StreamEvent>) -> JoinHandle<()> {
        let weak = Arc::downgrade(&self.inner);
        let span = self.inner.span.clone();

        tokio::spawn(
            async move {
                loop {
                    let event = match events.recv().await {
                        Ok(event) => event,
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "Stream subscriber lagged");
                            continue;
                        }
                        Err(RecvError::Closed) => {
                            debug!("Metadata stream channel closed");
                            return;
                        }
                    };

                    let Some(inner) = weak.upgrade() else {
                        return;
                    };
                    SyncEngine { inner }.on_stream_event(event);
                }
            }
            .instrument(span),
        )
    }

    async fn on_roster_tick(&self) {
        let had_player = self.snapshot().selected_player.is_some();

        if self.refresh_roster_and_reconcile().await == ReconcileOutcome::Skipped {
            return;
        }

        match (had_player, self.snapshot().selected_player) {
            (false, Some(player)) => {
                info!(%player, "Player appeared, starting player tasks");
                self.start_player_tasks(&player);
            }
            (true, None) => {
                info!("No players left, stopping player tasks");
                self.stop_player_tasks();
            }
            _ => {}
        }
    }

    async fn on_volume_tick(&self) {
        let Some(player) = self.snapshot().selected_player else {
            return;
        };
        let Some(volume) = self.inner.backend.volume(Some(&player)).await else {
            return;
        };

        self.update(|state| {
            if state.selected_player.as_ref() == Some(&player) {
                state.clone().with_volume(volume)
            } else {
                state.clone()
            }
        });
    }

    async fn on_metadata_tick(&self) {
        let Some(player) = self.snapshot().selected_player else {
            return;
        };
        let Some(metadata) = self.inner.backend.metadata(Some(&player)).await else {
            return;
        };

        let metadata = self.inner.stream.resolve_art(metadata).await;
        self.merge_media(metadata);
    }

    fn on_stream_event(&self, event: StreamEvent) {
        match event {
            StreamEvent::Metadata(metadata) => self.merge_media(metadata),
            StreamEvent::Error(error) => {
                warn!(%error, "Metadata stream error");
                self.update(|state| {
                    state
                        .clone()
                        .with_media(None)
                        .with_error(Some(error.to_string()))
                });
            }
        }
    }

    fn merge_media(&self, metadata: MediaDescriptor) {
        self.update(|state| merge_media(state, metadata));
    }
}

/// Fold a metadata record into the snapshot.
///
/// The per-player cache is keyed by the selected player when the record
/// matches it, otherwise by the first matching roster entry; records from
/// players outside the roster are not cached.
/// The displayed media only changes when the record belongs to the selected
/// player. Position-only differences are not changes.
fn merge_media(state: &StateSnapshot, metadata: MediaDescriptor) -> StateSnapshot {
    let mut next = state.clone();

    let selected = state
        .selected_player
        .as_ref()
        .filter(|id| is_same_logical_player(&metadata.player, id.as_str()));
    let key = selected.or_else(|| {
        state
            .players
            .iter()
            .find(|id| is_same_logical_player(&metadata.player, id.as_str()))
    });

    if let Some(key) = key.filter(|_| !metadata.player.is_empty()) {
        let cached = state
            .player_media
            .get(key)
            .is_some_and(|known| known.same_content(&metadata));
        if !cached {
            next = next.with_cached_media(key.clone(), metadata.clone());
        }
    }

    if !metadata.player.is_empty() && is_same_logical_player(&metadata.player, state.selected_str())
    {
        let displayed = state
            .current_media
            .as_ref()
            .is_some_and(|known| known.same_content(&metadata));
        if !displayed {
            next = next.with_media(Some(metadata)).with_error(None);
        }
    }

    next
}
