use std::collections::HashMap;

use super::{
    CliError, Command,
    commands::{config, media},
    context::CliContext,
    formatting::{
        format_category, format_command, format_description, format_header, format_subheader,
        format_usage,
    },
    types::CommandMetadata,
};

/// Registry for CLI commands organized by category.
///
/// ```text
/// registry
/// ├── config
/// │   ├── path
/// │   ├── schema
/// │   └── show
/// └── media
///     ├── list
///     ├── play
///     └── ...
/// ```
#[derive(Default)]
pub struct CommandRegistry {
    /// category name -> (command name -> command implementation)
    categories: HashMap<String, HashMap<String, Box<dyn Command>>>,
}

impl CommandRegistry {
    /// Creates a new empty command registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command in the specified category.
    ///
    /// The command's metadata name is its key within the category; a
    /// command with the same name is replaced.
    pub fn register_command(&mut self, category: &str, command: Box<dyn Command>) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .insert(command.metadata().name, command);
    }

    /// Registers every built-in command.
    pub fn register_all_commands(&mut self, context: &CliContext) {
        media::register_commands(self, context);
        config::register_commands(self, context);
    }

    /// Executes a command by category and name with the provided arguments.
    ///
    /// # Errors
    ///
    /// Returns `CliError::CommandNotFound` if the category or the command
    /// doesn't exist, `CliError::InvalidArguments` if the argument count
    /// does not fit the command. Other errors come from the command itself.
    pub async fn execute(
        &self,
        category: &str,
        command_name: &str,
        args: &[String],
    ) -> Result<String, CliError> {
        let found_category = self.categories.get(category).ok_or_else(|| {
            CliError::CommandNotFound(format!("Failed to find category '{category}'"))
        })?;

        let found_command = found_category.get(command_name).ok_or_else(|| {
            CliError::CommandNotFound(format!(
                "Failed to find command '{command_name}' in '{category}'"
            ))
        })?;

        Self::validate_args(&found_command.metadata(), args)?;

        found_command.execute(args).await
    }

    /// Lists all registered commands organized by category.
    ///
    /// Categories and commands are sorted alphabetically.
    pub fn list_commands(&self) -> Vec<(String, Vec<String>)> {
        let mut categories: Vec<(String, Vec<String>)> = self
            .categories
            .iter()
            .map(|(category, commands)| {
                let mut command_list: Vec<String> = commands.keys().cloned().collect();
                command_list.sort();

                (category.clone(), command_list)
            })
            .collect();

        categories.sort();

        categories
    }

    /// Metadata of one command, if registered
    pub fn command_metadata(&self, category: &str, command_name: &str) -> Option<CommandMetadata> {
        self.categories
            .get(category)?
            .get(command_name)
            .map(|command| command.metadata())
    }

    /// Overview of all categories
    pub fn general_help(&self) -> String {
        let mut output = format!(
            "{}\n\n{}\n  mpris-sync [--config <path>] [--log-file] <category> <command> [args...]\n\n{}\n",
            format_header("mpris-sync"),
            format_subheader("Usage:"),
            format_subheader("Categories:"),
        );

        for (category, commands) in self.list_commands() {
            output.push_str(&format!(
                "  {:<10} {}\n",
                format_category(&category),
                format_description(&commands.join(", "))
            ));
        }

        output.push_str(&format!(
            "\n{}",
            format_usage("Run 'mpris-sync help <category>' for details.")
        ));
        output
    }

    /// Commands of one category with their arguments and examples.
    ///
    /// # Errors
    ///
    /// Returns `CliError::CommandNotFound` for an unknown category.
    pub fn category_help(&self, category: &str) -> Result<String, CliError> {
        let commands = self.categories.get(category).ok_or_else(|| {
            CliError::CommandNotFound(format!("Failed to find category '{category}'"))
        })?;

        let mut metadata: Vec<CommandMetadata> =
            commands.values().map(|command| command.metadata()).collect();
        metadata.sort_by(|a, b| a.name.cmp(&b.name));

        let mut output = format!("{}\n", format_header(&format!("{category} commands")));
        for command in &metadata {
            output.push('\n');
            output.push_str(&Self::command_help(command));
        }
        Ok(output)
    }

    fn command_help(metadata: &CommandMetadata) -> String {
        let usage: Vec<String> = metadata
            .args
            .iter()
            .map(|arg| {
                if arg.required {
                    format!("<{}>", arg.name)
                } else {
                    format!("[{}]", arg.name)
                }
            })
            .collect();

        let mut output = format!(
            "  {} {}\n    {}\n",
            format_command(&metadata.name),
            usage.join(" "),
            format_description(&metadata.description)
        );

        for arg in &metadata.args {
            output.push_str(&format!(
                "    {:<10} ({}) {}\n",
                arg.name,
                arg.value_type.hint(),
                arg.description
            ));
        }
        for example in &metadata.examples {
            output.push_str(&format!("    {}\n", format_usage(example)));
        }
        output
    }

    fn validate_args(metadata: &CommandMetadata, args: &[String]) -> Result<(), CliError> {
        let required_count = metadata.args.iter().filter(|arg| arg.required).count();
        let total_count = metadata.args.len();

        if args.len() < required_count {
            return Err(CliError::InvalidArguments(format!(
                "Expected at least {} arguments, got {}",
                required_count,
                args.len(),
            )));
        }

        if args.len() > total_count {
            return Err(CliError::InvalidArguments(format!(
                "Expected at most {} arguments, got {}",
                total_count,
                args.len(),
            )));
        }

        Ok(())
    }
}
