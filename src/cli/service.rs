use super::{CliError, CommandRegistry, context::CliContext};

/// Entry point for running CLI commands.
///
/// Owns the registry with every built-in command and answers the `help`
/// pseudo-category itself.
pub struct CliService {
    registry: CommandRegistry,
}

impl CliService {
    /// Creates a CLI service with all available commands registered.
    pub fn new(context: &CliContext) -> Self {
        let mut registry = CommandRegistry::new();
        registry.register_all_commands(context);

        CliService { registry }
    }

    /// Executes a command by category and name with the provided arguments.
    ///
    /// `help`, an empty category, or a known category without a command
    /// print help instead.
    ///
    /// # Errors
    /// Returns `CliError::CommandNotFound` if the command doesn't exist in
    /// the category, or whatever the command itself fails with.
    pub async fn execute_command(
        &self,
        category: &str,
        command_name: &str,
        args: &[String],
    ) -> Result<String, CliError> {
        match (category, command_name) {
            ("" | "help", "") => Ok(self.registry.general_help()),
            ("help", category) | (category, "" | "help") => self.registry.category_help(category),
            _ => self.registry.execute(category, command_name, args).await,
        }
    }

    /// Lists all available commands organized by category.
    ///
    /// # Returns
    /// Vector of (category_name, command_names) tuples
    pub fn list_all(&self) -> Vec<(String, Vec<String>)> {
        self.registry.list_commands()
    }
}
