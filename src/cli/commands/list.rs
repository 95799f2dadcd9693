//! List command - show one directory of a service

use crate::cli::output::{
    colors, format_bytes, format_rfc3339_relative, print_warning, unwrap_response,
};
use crate::cli::OutputFormat;
use crate::gateway::RequestDispatcher;
use clap::Args;
use serde::Deserialize;
use serde_json::json;

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Service name (see `fsgate structure`)
    pub service: String,

    /// Directory relative to the service root (defaults to the root)
    pub dir: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListingView {
    service: String,
    path: String,
    total: usize,
    truncated: bool,
    entries: Vec<EntryView>,
}

#[derive(Debug, Deserialize)]
struct EntryView {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    size: Option<u64>,
    modified: Option<String>,
}

/// Execute the list command
pub async fn execute(
    args: ListArgs,
    dispatcher: &RequestDispatcher,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut params = json!({ "service": args.service });
    if let Some(dir) = args.dir {
        params["dirPath"] = json!(dir);
    }

    let response = dispatcher.dispatch("list", &params).await;
    let Some(texts) = unwrap_response(response, format)? else {
        return Ok(());
    };

    let body = texts.first().map(String::as_str).unwrap_or("{}");
    let listing: ListingView = serde_json::from_str(body)?;
    print_listing(&listing);

    Ok(())
}

fn print_listing(listing: &ListingView) {
    println!(
        "{} {}",
        colors::service(&listing.service),
        colors::file_path(&listing.path)
    );

    if listing.entries.is_empty() {
        println!("  {}", colors::dim("(empty)"));
    }

    for entry in &listing.entries {
        let size = entry.size.map(format_bytes).unwrap_or_default();
        let modified = entry
            .modified
            .as_deref()
            .map(format_rfc3339_relative)
            .unwrap_or_default();
        let name = if entry.kind == "directory" {
            colors::directory(&format!("{}/", entry.name)).to_string()
        } else {
            entry.name.clone()
        };
        println!(
            "  {:>10}  {:>10}  {}",
            colors::number(&size),
            colors::dim(&modified),
            name
        );
    }

    if listing.truncated {
        print_warning(&format!(
            "showing {} of {} entries",
            listing.entries.len(),
            listing.total
        ));
    }
}
