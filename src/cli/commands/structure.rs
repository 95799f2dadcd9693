//! Structure command - show the configured services

use crate::cli::output::{colors, print_header, unwrap_response};
use crate::cli::OutputFormat;
use crate::gateway::RequestDispatcher;
use clap::Args;
use serde::Deserialize;
use serde_json::json;

/// Arguments for the structure command
#[derive(Args, Debug)]
pub struct StructureArgs {}

#[derive(Debug, Deserialize)]
struct StructureView {
    services: Vec<ServiceView>,
    total: usize,
}

#[derive(Debug, Deserialize)]
struct ServiceView {
    name: String,
    root: String,
    operations: Vec<String>,
    exists: bool,
}

/// Execute the structure command
pub async fn execute(
    _args: StructureArgs,
    dispatcher: &RequestDispatcher,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = dispatcher.dispatch("structure", &json!({})).await;
    let Some(texts) = unwrap_response(response, format)? else {
        return Ok(());
    };

    let body = texts.first().map(String::as_str).unwrap_or("{}");
    let view: StructureView = serde_json::from_str(body)?;

    print_header(&format!("Services ({})", view.total));
    for service in &view.services {
        let missing = if service.exists {
            String::new()
        } else {
            format!(" {}", colors::warning("(missing)"))
        };
        println!(
            "  {:<12} {}{}",
            colors::service(&service.name),
            colors::file_path(&service.root),
            missing
        );
        println!(
            "  {:<12} {}",
            "",
            colors::dim(&service.operations.join(", "))
        );
    }

    Ok(())
}
