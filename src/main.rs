//! mpris-sync - command-line front end for the media sync engine.

use std::{error::Error, path::PathBuf, process};

use clap::Parser;
use mpris_sync::{
    cli::{CliContext, CliService, formatting::format_error},
    config::{Config, ConfigPaths},
    tracing_config,
};
use tracing::debug;

#[derive(Parser)]
#[command(name = "mpris-sync", version)]
#[command(about = "Keep one coherent media state feed over playerctl")]
struct Cli {
    /// Configuration file to use instead of the XDG location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also write logs to a daily-rotated file
    #[arg(long)]
    log_file: bool,

    /// Command category (media, config, help)
    category: Option<String>,

    /// Command within the category
    command: Option<String>,

    /// Arguments for the command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => ConfigPaths::main_config()?,
    };

    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {e}", format_error("Error"));
            process::exit(1);
        }
    };

    if cli.log_file {
        tracing_config::init_with_file(&config.general)?;
    } else {
        tracing_config::init(&config.general)?;
    }
    debug!(path = %config_path.display(), "Configuration resolved");

    let context = CliContext::new(config, config_path);
    let cli_service = CliService::new(&context);

    let category = cli.category.as_deref().unwrap_or("help");
    let command = cli.command.as_deref().unwrap_or("");

    match cli_service
        .execute_command(category, command, &cli.args)
        .await
    {
        Ok(output) => {
            if !output.trim().is_empty() {
                println!("{output}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}: {e}", format_error("Error"));
            process::exit(1);
        }
    }
}
