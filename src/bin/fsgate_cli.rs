//! fsgate CLI - Command-line interface for the file gateway
//!
//! Runs the same sandboxed operations as the MCP server, for
//! scripting or manual inspection without an MCP client.
//!
//! # Examples
//!
//! ```bash
//! # Show the configured services
//! fsgate structure
//!
//! # Read a file
//! fsgate read frontend src/main.ts
//!
//! # List a directory
//! fsgate list api src
//!
//! # Search the whole project
//! fsgate search "TODO" --file-type .rs
//!
//! # Machine-readable response envelope
//! fsgate --format json search "TODO" --service api
//! ```

use clap::Parser;
use fsgate::cli::{run, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Quiet by default; operation failures are already reported on stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fsgate=warn")),
        )
        .with_ansi(false)
        .compact()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        fsgate::cli::output::print_error(&e.to_string());
        std::process::exit(1);
    }
}
