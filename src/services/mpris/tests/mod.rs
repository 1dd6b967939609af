//! Unit tests for the mpris service
//!
//! The control program is replaced by scripted fakes; timers run on a
//! paused clock.

#![allow(clippy::panic, clippy::unwrap_used)]

mod change;
mod client;
pub(crate) mod support;
