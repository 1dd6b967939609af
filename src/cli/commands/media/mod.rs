//! Media player commands, each driving a short-lived sync engine.
mod list;
mod loop_mode;
mod seek;
mod shuffle;
mod status;
mod switch;
mod transport;
pub mod utils;
mod volume;
mod watch;

pub use list::ListCommand;
pub use loop_mode::LoopCommand;
pub use seek::{SeekCommand, SeekTarget};
pub use shuffle::ShuffleCommand;
pub use status::StatusCommand;
pub use switch::SwitchCommand;
pub use transport::{Transport, TransportCommand};
pub use volume::VolumeCommand;
pub use watch::WatchCommand;

use crate::cli::{CliContext, CommandRegistry};

/// Registers all media commands in the "media" category
pub fn register_commands(registry: &mut CommandRegistry, context: &CliContext) {
    const CATEGORY_NAME: &str = "media";
    let engine = &context.engine;

    registry.register_command(CATEGORY_NAME, Box::new(ListCommand::new(engine.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(StatusCommand::new(engine.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(WatchCommand::new(engine.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(SwitchCommand::new(engine.clone())));

    for action in Transport::ALL {
        registry.register_command(
            CATEGORY_NAME,
            Box::new(TransportCommand::new(action, engine.clone())),
        );
    }

    registry.register_command(CATEGORY_NAME, Box::new(VolumeCommand::new(engine.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(ShuffleCommand::new(engine.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(LoopCommand::new(engine.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(SeekCommand::new(engine.clone())));
}
