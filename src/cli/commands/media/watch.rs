use async_trait::async_trait;
use futures::StreamExt;
use tokio::{pin, signal};
use tracing::{debug, warn};

use crate::cli::{
    Command, CommandMetadata, CommandResult, EngineFactory, formatting::snapshot_json_line,
};

use super::utils::{player_arg, resolve_player, start_engine};

/// Command to follow the state feed
///
/// Prints every published snapshot as one JSON line until interrupted.
pub struct WatchCommand {
    engine: EngineFactory,
}

impl WatchCommand {
    /// Creates a new WatchCommand
    pub fn new(engine: EngineFactory) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Command for WatchCommand {
    /// Streams snapshots to stdout until Ctrl-C
    ///
    /// # Errors
    ///
    /// Returns CliError if the control program is missing, the given player
    /// does not exist, or a snapshot cannot be serialized
    async fn execute(&self, args: &[String]) -> CommandResult {
        let engine = start_engine(&self.engine).await?;

        if let Some(identifier) = args.first() {
            if let Err(e) = resolve_player(&engine, Some(identifier)).await {
                engine.dispose();
                return Err(e);
            }
        }

        let snapshots = engine.watch();
        let ctrl_c = signal::ctrl_c();
        pin!(snapshots, ctrl_c);

        let result = loop {
            tokio::select! {
                snapshot = snapshots.next() => {
                    let Some(snapshot) = snapshot else {
                        debug!("Snapshot feed closed");
                        break Ok(String::new());
                    };
                    match snapshot_json_line(&snapshot) {
                        Ok(line) => println!("{line}"),
                        Err(e) => break Err(e),
                    }
                }
                interrupted = &mut ctrl_c => {
                    if let Err(e) = interrupted {
                        warn!(error = %e, "Could not listen for Ctrl-C");
                    }
                    break Ok(String::new());
                }
            }
        };

        engine.dispose();
        result
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "watch".to_string(),
            description: "Print every state change as a JSON line until Ctrl-C".to_string(),
            category: "media".to_string(),
            args: vec![player_arg()],
            examples: vec![
                "mpris-sync media watch".to_string(),
                "mpris-sync media watch spotify | jq .current_media.title".to_string(),
            ],
        }
    }
}
