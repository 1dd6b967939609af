//! Restart-supervised metadata stream.
//!
//! One long-lived `--follow` process per `listen()` call. Lines are parsed in
//! arrival order, change-gated and republished on a broadcast channel.
//! Unplanned exits are retried with a fixed delay until the restart budget
//! is spent, after which a single `StreamExhausted` error is published and
//! the stream stays in `Failed` until the owner listens again.

mod supervisor;

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{Instrument, Span, debug};

use super::{ArtServer, CommandRunner, KillSwitch, MediaDescriptor, MediaError, PlayerId, art};
use supervisor::Supervisor;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Restart policy for the metadata stream
#[derive(Debug, Clone, PartialEq)]
pub struct StreamSettings {
    /// Restarts allowed without valid intervening data
    pub max_restart_attempts: u32,
    /// Delay before each restart
    pub restart_delay: Duration,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            max_restart_attempts: 5,
            restart_delay: Duration::from_secs(2),
        }
    }
}

/// Lifecycle of the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamPhase {
    /// Not listening
    #[default]
    Idle,
    /// Spawning the follow process
    Starting,
    /// Process is live and lines are being consumed
    Listening,
    /// Process exited; a restart is scheduled
    AwaitingRestart,
    /// Restart budget spent; waiting for an explicit `listen()`
    Failed,
}

/// Item published to stream subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Changed metadata for some player
    Metadata(MediaDescriptor),
    /// `NoActivePlayer` (transient) or `StreamExhausted` (terminal)
    Error(MediaError),
}

#[derive(Default)]
struct StreamControl {
    generation: u64,
    should_listen: bool,
    phase: StreamPhase,
    attempts: u32,
    target: Option<PlayerId>,
    task: Option<JoinHandle<()>>,
    kill: Option<KillSwitch>,
    events: Option<broadcast::Sender<StreamEvent>>,
}

pub(super) struct StreamShared {
    runner: Arc<dyn CommandRunner>,
    art: Arc<dyn ArtServer>,
    settings: StreamSettings,
    control: Mutex<StreamControl>,
}

impl StreamShared {
    fn control(&self) -> MutexGuard<'_, StreamControl> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_current(&self, generation: u64) -> bool {
        let control = self.control();
        control.should_listen && control.generation == generation
    }

    fn set_phase(&self, generation: u64, phase: StreamPhase) {
        let mut control = self.control();
        if control.should_listen && control.generation == generation {
            control.phase = phase;
        }
    }

    fn set_attempts(&self, generation: u64, attempts: u32) {
        let mut control = self.control();
        if control.generation == generation {
            control.attempts = attempts;
        }
    }

    /// Returns false if the stream was stopped while the process spawned.
    fn register_kill(&self, generation: u64, kill: KillSwitch) -> bool {
        let mut control = self.control();
        if !(control.should_listen && control.generation == generation) {
            return false;
        }
        control.kill = Some(kill);
        true
    }

    fn clear_kill(&self, generation: u64) {
        let mut control = self.control();
        if control.generation == generation {
            control.kill = None;
        }
    }

    fn mark_failed(&self, generation: u64) {
        let mut control = self.control();
        if control.generation == generation {
            control.should_listen = false;
            control.phase = StreamPhase::Failed;
            control.events = None;
            control.kill = None;
            control.task = None;
        }
    }

    async fn resolve_art(&self, mut metadata: MediaDescriptor) -> MediaDescriptor {
        let Some(path) = metadata.art_url.as_deref().and_then(art::file_url_path) else {
            return metadata;
        };

        match self.art.register_file(&path).await {
            Ok(url) => metadata.art_url = Some(url),
            Err(e) => debug!(error = %e, "Keeping original artwork locator"),
        }
        metadata
    }
}

/// Supervises the long-lived `--follow` process.
///
/// At most one process is live at a time; `listen()` replaces any previous
/// one and `stop_listening()` force-kills it.
pub struct MetadataStream {
    shared: Arc<StreamShared>,
    span: Span,
}

impl MetadataStream {
    /// Create an idle stream
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        art: Arc<dyn ArtServer>,
        settings: StreamSettings,
        span: Span,
    ) -> Self {
        Self {
            shared: Arc::new(StreamShared {
                runner,
                art,
                settings,
                control: Mutex::new(StreamControl::default()),
            }),
            span,
        }
    }

    /// Start following `player` (or the default player) and subscribe.
    ///
    /// Any previous process is killed first and the restart counter is reset.
    pub fn listen(&self, player: Option<PlayerId>) -> broadcast::Receiver<StreamEvent> {
        self.stop_listening();

        let (events_tx, events_rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let mut control = self.shared.control();
        control.generation += 1;
        control.should_listen = true;
        control.phase = StreamPhase::Starting;
        control.attempts = 0;
        control.target = player.clone();
        control.events = Some(events_tx.clone());

        let supervisor = Supervisor::new(
            Arc::clone(&self.shared),
            control.generation,
            player,
            events_tx,
        );
        control.task = Some(tokio::spawn(
            supervisor.run().instrument(self.span.clone()),
        ));

        events_rx
    }

    /// Additional subscription to the current stream, if listening
    pub fn subscribe(&self) -> Option<broadcast::Receiver<StreamEvent>> {
        self.shared
            .control()
            .events
            .as_ref()
            .map(broadcast::Sender::subscribe)
    }

    /// Stop from any state: cancel a pending restart, kill the process,
    /// close the channel and reset the counter. Idempotent.
    pub fn stop_listening(&self) {
        let mut control = self.shared.control();
        control.generation += 1;
        control.should_listen = false;
        control.phase = StreamPhase::Idle;
        control.attempts = 0;
        control.target = None;
        control.events = None;

        if let Some(kill) = control.kill.take() {
            kill.trigger();
        }
        if let Some(task) = control.task.take() {
            task.abort();
        }
    }

    /// Stop listening and shut down the artwork server
    pub fn shutdown(&self) {
        self.stop_listening();
        self.shared.art.stop();
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> StreamPhase {
        self.shared.control().phase
    }

    /// Restarts performed since the last valid changed record
    pub fn restart_attempts(&self) -> u32 {
        self.shared.control().attempts
    }

    /// Player the stream is following
    pub fn target(&self) -> Option<PlayerId> {
        self.shared.control().target.clone()
    }

    /// Replace a `file://` art locator with a served URL.
    ///
    /// Failures keep the original locator; other schemes pass through.
    pub async fn resolve_art(&self, metadata: MediaDescriptor) -> MediaDescriptor {
        self.shared.resolve_art(metadata).await
    }
}

impl Drop for MetadataStream {
    fn drop(&mut self) {
        self.shutdown();
    }
}
