//! CLI adapter for fsgate
//!
//! Provides a command-line interface over the gateway operations.
//! This module is parallel to `mcp/` - both go through the same
//! `RequestDispatcher` but do not depend on each other.
//!
//! # Architecture
//!
//! ```text
//!              +------------------+
//!              |     core/        |
//!              |  (domain logic)  |
//!              +--------+---------+
//!                       |
//!              +--------+---------+
//!              |    gateway/      |
//!              | (dispatch, I/O)  |
//!              +--------+---------+
//!                       |
//!          +------------+------------+
//!          |                         |
//!          v                         v
//! +------------------+      +------------------+
//! |      mcp/        |      |      cli/        |
//! | (stdio adapter)  |      | (clap adapter)   |
//! +------------------+      +------------------+
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// fsgate - sandboxed multi-service file gateway
///
/// Read, list and search files inside configured service roots.
/// Paths cannot leave their service root and secrets are redacted
/// from everything printed.
#[derive(Parser, Debug)]
#[command(name = "fsgate")]
#[command(version)]
#[command(about = "Sandboxed multi-service file gateway", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON response envelope, for scripting
    Json,
}

/// Available CLI commands
///
/// Command names match the canonical operation names.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read a file from a service
    Read(commands::ReadArgs),

    /// List a directory in a service
    List(commands::ListArgs),

    /// Search for a literal string across services
    Search(commands::SearchArgs),

    /// Show the configured services
    Structure(commands::StructureArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  fsgate completions bash > ~/.local/share/bash-completion/completions/fsgate
    ///   zsh:   fsgate completions zsh > ~/.zfunc/_fsgate
    ///   fish:  fsgate completions fish > ~/.config/fish/completions/fsgate.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::services::Services;
    use crate::gateway::RequestDispatcher;

    let command = match cli.command {
        // Handle completions early (doesn't need services)
        Commands::Completions(args) => return commands::completions::execute(args),
        command => command,
    };

    // Load configuration
    let config = Config::load()?;

    // Create services
    let dispatcher = RequestDispatcher::new(Services::new(config));

    // Execute command
    match command {
        Commands::Read(args) => commands::read::execute(args, &dispatcher, cli.format).await,
        Commands::List(args) => commands::list::execute(args, &dispatcher, cli.format).await,
        Commands::Search(args) => commands::search::execute(args, &dispatcher, cli.format).await,
        Commands::Structure(args) => {
            commands::structure::execute(args, &dispatcher, cli.format).await
        }
        Commands::ShowConfig(args) => {
            commands::config::execute(args, dispatcher.services(), cli.format)
        }
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
