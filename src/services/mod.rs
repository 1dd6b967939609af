/// Shared building blocks for services
pub mod common;
/// Media player synchronization over the MPRIS control program
pub mod mpris;

pub use mpris::{MediaError, StateSnapshot, SyncEngine};
