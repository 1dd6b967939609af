//! Command-line interface.
//!
//! Commands are organized by category and generate their help text from
//! metadata. Media commands each run a short-lived sync engine.

mod commands;
mod context;
pub mod formatting;
mod registry;
mod service;
mod types;

pub use context::{CliContext, EngineFactory};
pub use registry::CommandRegistry;
pub use service::CliService;
pub use types::{ArgType, CliError, Command, CommandArg, CommandMetadata, CommandResult};

#[cfg(test)]
mod tests;
