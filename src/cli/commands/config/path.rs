use std::path::PathBuf;

use async_trait::async_trait;

use crate::cli::{Command, CommandMetadata, CommandResult};

/// Command to print where the configuration is read from
pub struct PathCommand {
    path: PathBuf,
}

impl PathCommand {
    /// Creates a new PathCommand
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl Command for PathCommand {
    async fn execute(&self, _args: &[String]) -> CommandResult {
        let state = if self.path.exists() {
            ""
        } else {
            " (not created, defaults in use)"
        };
        Ok(format!("{}{state}", self.path.display()))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "path".to_string(),
            description: "Print the configuration file location".to_string(),
            category: "config".to_string(),
            args: vec![],
            examples: vec!["mpris-sync config path".to_string()],
        }
    }
}
