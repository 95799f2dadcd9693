//! fsgate MCP (Model Context Protocol) Server
//!
//! A stdio-based MCP server that exposes the gateway operations
//! (read, list, search, structure) as tools for MCP clients.
//!
//! stdout carries protocol messages only, so all logging goes to
//! stderr. Set `RUST_LOG` to change the filter and
//! `FSGATE_LOG_FORMAT=json` for structured logs.

use fsgate::core::config::Config;
use fsgate::core::services::Services;
use fsgate::core::xdg::XdgDirs;
use fsgate::mcp::McpServer;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fsgate=info"));

    let json = std::env::var("FSGATE_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr) // Critical: stderr not stdout
        .with_env_filter(filter)
        .with_ansi(false); // No color codes

    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

#[tokio::main]
async fn main() {
    init_logging();

    XdgDirs::new().log_paths();

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {e}");
        std::process::exit(1);
    });
    config.log_config();

    // Create and run MCP server
    let mut server = McpServer::new(Services::new(config));

    if let Err(e) = server.run().await {
        eprintln!("MCP server error: {e}");
        std::process::exit(1);
    }
}
