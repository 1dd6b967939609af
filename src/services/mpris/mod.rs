/// Local HTTP server for `file://` artwork
pub mod art;
/// Content-based duplicate suppression
pub mod change;
/// Backend over the control program
pub mod client;
/// Media error types
pub mod error;
/// Logical player identity
pub mod identity;
/// Command-line arguments and output parsing for the control program
pub mod protocol;
/// Process execution seam
pub mod runner;
/// Published state
pub mod snapshot;
/// Supervised metadata follow stream
pub mod stream;
/// Orchestrating sync engine
pub mod sync;
/// Backend capability traits
pub mod traits;
/// Domain value types
pub mod types;

pub use art::{ArtServer, LocalArtServer};
pub use change::ChangeGate;
pub use client::PlayerctlClient;
pub use error::MediaError;
pub use identity::is_same_logical_player;
pub use runner::{
    CommandOutput, CommandRunner, KillSwitch, LineStream, ProcessRunner, StreamingProcess,
};
pub use snapshot::StateSnapshot;
pub use stream::{MetadataStream, StreamEvent, StreamPhase, StreamSettings};
pub use sync::{EngineSettings, ReconcileOutcome, SyncEngine};
pub use traits::*;
pub use types::*;

#[cfg(test)]
pub(crate) mod tests;
