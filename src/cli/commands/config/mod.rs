//! Configuration inspection commands.
mod path;
mod schema;
mod show;

pub use path::PathCommand;
pub use schema::SchemaCommand;
pub use show::ShowCommand;

use crate::cli::{CliContext, CommandRegistry};

/// Registers all configuration commands in the "config" category
pub fn register_commands(registry: &mut CommandRegistry, context: &CliContext) {
    const CATEGORY_NAME: &str = "config";

    registry.register_command(
        CATEGORY_NAME,
        Box::new(ShowCommand::new(context.config.clone())),
    );
    registry.register_command(CATEGORY_NAME, Box::new(SchemaCommand));
    registry.register_command(
        CATEGORY_NAME,
        Box::new(PathCommand::new(context.config_path.clone())),
    );
}
