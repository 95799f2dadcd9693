//! Show-config command - print the effective configuration

use crate::cli::output::{colors, format_bytes};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::services::Services;
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;

/// Arguments for the show-config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Also show blocked extensions and substrings
    #[arg(long, short = 'a')]
    pub all: bool,
}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse<'a> {
    pub config_file: String,
    #[serde(flatten)]
    pub config: &'a Config,
}

/// Execute the show-config command
pub fn execute(
    args: ConfigArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = services.config.as_ref();
    let config_file = XdgDirs::new().config_file().to_string_lossy().into_owned();
    let response = ConfigResponse {
        config_file,
        config,
    };

    match format {
        OutputFormat::Human => print_human(&response, args.all),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

fn print_human(response: &ConfigResponse<'_>, all: bool) {
    let config = response.config;

    println!("{}", colors::label("Configuration:"));
    println!("  config_file: {}", colors::file_path(&response.config_file));
    println!(
        "  project_root: {}",
        colors::file_path(&config.project.root.display().to_string())
    );

    println!("  services:");
    for (name, service) in &config.services {
        let ops: Vec<&str> = service.operations.iter().map(|op| op.as_str()).collect();
        println!(
            "    {}: {} [{}]",
            colors::service(name),
            service.path.display(),
            ops.join(", ")
        );
    }

    println!("  policy:");
    println!("    allow_dotfiles: {}", config.policy.allow_dotfiles);
    if all {
        println!(
            "    blocked_extensions: {:?}",
            config.policy.blocked_extensions
        );
        println!(
            "    blocked_substrings: {:?}",
            config.policy.blocked_substrings
        );
    } else {
        println!(
            "    blocked_extensions: {} entries",
            config.policy.blocked_extensions.len()
        );
        println!(
            "    blocked_substrings: {} entries",
            config.policy.blocked_substrings.len()
        );
    }

    let limits = &config.limits;
    println!("  limits:");
    println!(
        "    max_bytes_per_file: {}",
        format_bytes(limits.max_bytes_per_file)
    );
    println!(
        "    max_results: {} (cap {})",
        limits.default_max_results, limits.max_results_cap
    );
    println!("    max_list_entries: {}", limits.max_list_entries);
    println!("    max_query_length: {}", limits.max_query_length);
    println!("    snippet_max_chars: {}", limits.snippet_max_chars);
    println!("    search_timeout_ms: {}", limits.search_timeout_ms);

    println!("  rate_limit:");
    println!(
        "    {} requests per {}ms",
        config.rate_limit.requests, config.rate_limit.interval_ms
    );
}
