//! Orchestrating manager that owns the state snapshot.
//!
//! Four sources feed the snapshot: the roster liveness timer, the metadata
//! stream subscription, the metadata refresh timer and the volume timer.
//! They are not mutually excluded; every merge goes through
//! [`Property::update`], which serializes writers and drops no-op changes.

mod control;
mod roster;
mod tasks;

use std::{
    net::SocketAddr,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use futures::Stream;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{Span, debug, info, info_span, instrument, warn};

use super::{
    LocalArtServer, MediaBackend, MediaError, MetadataStream, PlayerctlClient, ProcessRunner,
    StateSnapshot, StreamPhase, StreamSettings,
};
use crate::services::common::Property;

pub use roster::ReconcileOutcome;

/// Timer cadences and delays for the engine
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Roster liveness poll
    pub roster_interval: Duration,
    /// Volume poll for the selected player
    pub volume_interval: Duration,
    /// Fallback metadata poll for the selected player
    pub metadata_interval: Duration,
    /// Pause between tearing down and rebuilding player tasks
    pub settle_delay: Duration,
    /// Restart policy of the metadata stream
    pub stream: StreamSettings,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            roster_interval: Duration::from_secs(5),
            volume_interval: Duration::from_secs(2),
            metadata_interval: Duration::from_secs(3),
            settle_delay: Duration::from_millis(100),
            stream: StreamSettings::default(),
        }
    }
}

#[derive(Default)]
struct EngineTasks {
    roster: Option<JoinHandle<()>>,
    volume: Option<JoinHandle<()>>,
    metadata: Option<JoinHandle<()>>,
    subscription: Option<JoinHandle<()>>,
}

impl EngineTasks {
    fn abort(handle: &mut Option<JoinHandle<()>>) {
        if let Some(handle) = handle.take() {
            handle.abort();
        }
    }

    fn abort_player_tasks(&mut self) {
        Self::abort(&mut self.subscription);
        Self::abort(&mut self.volume);
        Self::abort(&mut self.metadata);
    }

    fn abort_all(&mut self) {
        self.abort_player_tasks();
        Self::abort(&mut self.roster);
    }
}

struct EngineInner {
    backend: Arc<dyn MediaBackend>,
    stream: MetadataStream,
    state: Property<StateSnapshot>,
    settings: EngineSettings,
    refreshing: AtomicBool,
    disposed: AtomicBool,
    tasks: Mutex<EngineTasks>,
    span: Span,
}

impl Drop for EngineInner {
    fn drop(&mut self) {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .abort_all();
    }
}

/// Keeps one coherent [`StateSnapshot`] for all consumers.
///
/// Cheap to clone; clones share the same state and tasks. Background
/// tasks hold only weak references, so dropping every clone stops them.
#[derive(Clone)]
pub struct SyncEngine {
    inner: Arc<EngineInner>,
}

impl SyncEngine {
    /// Create an engine over explicit collaborators.
    ///
    /// `span` is the parent of everything the engine logs.
    pub fn new(
        backend: Arc<dyn MediaBackend>,
        stream: MetadataStream,
        settings: EngineSettings,
        span: Span,
    ) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                backend,
                stream,
                state: Property::new(StateSnapshot::initial()),
                settings,
                refreshing: AtomicBool::new(false),
                disposed: AtomicBool::new(false),
                tasks: Mutex::new(EngineTasks::default()),
                span,
            }),
        }
    }

    /// Engine driving the real control program.
    pub fn with_playerctl(
        binary: &str,
        ignored_players: Vec<String>,
        art_addr: SocketAddr,
        settings: EngineSettings,
    ) -> Self {
        let span = info_span!("mpris_sync", binary);
        let runner = Arc::new(ProcessRunner::new(binary));
        let backend = Arc::new(PlayerctlClient::new(
            runner.clone(),
            binary,
            ignored_players,
        ));
        let stream = MetadataStream::new(
            runner,
            Arc::new(LocalArtServer::new(art_addr)),
            settings.stream.clone(),
            span.clone(),
        );

        Self::new(backend, stream, settings, span)
    }

    /// Current snapshot
    pub fn snapshot(&self) -> StateSnapshot {
        self.inner.state.get()
    }

    /// Stream of snapshots, starting with the current one.
    ///
    /// Ends after `dispose()`.
    pub fn watch(&self) -> impl Stream<Item = StateSnapshot> + Send + use<> {
        self.inner.state.watch()
    }

    /// Raw change receiver
    pub fn subscribe(&self) -> watch::Receiver<StateSnapshot> {
        self.inner.state.subscribe()
    }

    /// Lifecycle phase of the metadata stream
    pub fn stream_phase(&self) -> StreamPhase {
        self.inner.stream.phase()
    }

    /// Probe the control program, pick a player and start the timers.
    ///
    /// A missing program leaves a non-fatal error in the snapshot and starts
    /// nothing. Otherwise the roster timer always runs, so players started
    /// later are picked up.
    #[instrument(parent = &self.inner.span, skip_all)]
    pub async fn initialize(&self) {
        let backend = &self.inner.backend;

        if !backend.is_installed().await {
            let error = MediaError::NotInstalled {
                binary: backend.binary().to_string(),
            };
            warn!(%error, "Control program missing");
            self.update(|state| {
                state
                    .clone()
                    .with_installed(false)
                    .with_loading(false)
                    .with_error(Some(error.to_string()))
            });
            return;
        }

        match backend.version().await {
            Some(version) => info!(%version, "Control program found"),
            None => debug!("Control program version unavailable"),
        }
        self.update(|state| state.clone().with_installed(true));

        self.refresh_roster_and_reconcile().await;
        if let Some(player) = self.snapshot().selected_player {
            self.start_player_tasks(&player);
        }

        self.update(|state| state.clone().with_loading(false));
        self.start_roster_timer();
    }

    /// Cancel all timers and the subscription, stop the stream and close
    /// the snapshot channel. Idempotent.
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::AcqRel) {
            return;
        }

        self.tasks().abort_all();
        self.inner.stream.shutdown();
        self.inner.state.close();
        info!(parent: &self.inner.span, "Sync engine disposed");
    }

    /// Whether `dispose()` has run
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }

    fn update<F>(&self, next: F) -> bool
    where
        F: FnOnce(&StateSnapshot) -> StateSnapshot,
    {
        self.inner.state.update(next)
    }

    fn tasks(&self) -> MutexGuard<'_, EngineTasks> {
        self.inner
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
