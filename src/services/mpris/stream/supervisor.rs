use std::{sync::Arc, time::Duration};

use futures::StreamExt;
use tokio::{sync::broadcast, time};
use tracing::{debug, error, info, trace, warn};

use super::{StreamEvent, StreamPhase, StreamShared};
use crate::services::mpris::{ChangeGate, MediaError, PlayerId, StreamingProcess, protocol};

/// Stderr of a helper that outlives the process may stay open.
const STDERR_DRAIN_TIMEOUT: Duration = Duration::from_millis(250);

/// Drives one `listen()` generation through start, pump and restart.
pub(super) struct Supervisor {
    shared: Arc<StreamShared>,
    generation: u64,
    player: Option<PlayerId>,
    events: broadcast::Sender<StreamEvent>,
    gate: ChangeGate,
    attempts: u32,
}

impl Supervisor {
    pub(super) fn new(
        shared: Arc<StreamShared>,
        generation: u64,
        player: Option<PlayerId>,
        events: broadcast::Sender<StreamEvent>,
    ) -> Self {
        Self {
            shared,
            generation,
            player,
            events,
            gate: ChangeGate::default(),
            attempts: 0,
        }
    }

    pub(super) async fn run(mut self) {
        let max_attempts = self.shared.settings.max_restart_attempts;
        let restart_delay = self.shared.settings.restart_delay;

        loop {
            if !self.shared.is_current(self.generation) {
                return;
            }
            self.shared.set_phase(self.generation, StreamPhase::Starting);

            let args = protocol::follow_metadata(self.player.as_ref());
            match self.shared.runner.start_streaming(&args).await {
                Ok(mut process) => {
                    if !self
                        .shared
                        .register_kill(self.generation, process.kill_switch())
                    {
                        process.kill();
                        return;
                    }
                    self.shared.set_phase(self.generation, StreamPhase::Listening);
                    info!(player = ?self.player, "Metadata stream started");

                    let exit_code = self.pump(&mut process).await;
                    self.shared.clear_kill(self.generation);
                    debug!(?exit_code, "Metadata stream process exited");
                }
                Err(e) => warn!(error = %e, "Failed to start metadata stream"),
            }

            // stop_listening() may have run while we were pumping
            if !self.shared.is_current(self.generation) {
                return;
            }

            if self.attempts >= max_attempts {
                error!(
                    attempts = self.attempts,
                    "Metadata stream exhausted its restart budget"
                );
                let _ = self
                    .events
                    .send(StreamEvent::Error(MediaError::StreamExhausted {
                        attempts: self.attempts,
                    }));
                self.shared.mark_failed(self.generation);
                return;
            }

            self.attempts += 1;
            self.shared.set_attempts(self.generation, self.attempts);
            self.shared
                .set_phase(self.generation, StreamPhase::AwaitingRestart);
            warn!(
                attempt = self.attempts,
                max_attempts,
                delay = ?restart_delay,
                "Metadata stream exited unexpectedly, scheduling restart"
            );

            time::sleep(restart_delay).await;
        }
    }

    /// Consume output until stdout closes, drain what is left on stderr,
    /// then collect the exit code.
    async fn pump(&mut self, process: &mut StreamingProcess) -> Option<i32> {
        let mut stderr_open = true;

        loop {
            tokio::select! {
                biased;

                line = process.stdout.next() => match line {
                    Some(line) => self.handle_line(&line).await,
                    None => break,
                },
                line = process.stderr.next(), if stderr_open => match line {
                    Some(line) => self.handle_stderr(&line),
                    None => stderr_open = false,
                },
            }
        }

        if stderr_open {
            let drained = time::timeout(STDERR_DRAIN_TIMEOUT, async {
                while let Some(line) = process.stderr.next().await {
                    self.handle_stderr(&line);
                }
            })
            .await;
            if drained.is_err() {
                debug!("Metadata stream stderr still open after stdout closed");
            }
        }

        process.wait().await
    }

    async fn handle_line(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }

        let metadata = match protocol::parse_metadata_line(line) {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!(error = %e, "Dropping unparseable stream line");
                return;
            }
        };

        if !self.gate.admit(&metadata) {
            trace!(player = %metadata.player, "Unchanged metadata suppressed");
            return;
        }

        self.attempts = 0;
        self.shared.set_attempts(self.generation, 0);

        let metadata = self.shared.resolve_art(metadata).await;
        let _ = self.events.send(StreamEvent::Metadata(metadata));
    }

    fn handle_stderr(&self, line: &str) {
        if protocol::is_no_players_message(line) {
            debug!("Metadata stream reports no active player");
            let _ = self
                .events
                .send(StreamEvent::Error(MediaError::NoActivePlayer));
        } else if !line.trim().is_empty() {
            debug!(line, "Metadata stream stderr");
        }
    }
}
