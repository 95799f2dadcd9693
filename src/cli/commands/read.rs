//! Read command - print one file from a service

use crate::cli::output::{print_warning, unwrap_response};
use crate::cli::OutputFormat;
use crate::gateway::RequestDispatcher;
use clap::Args;
use serde_json::json;

/// Arguments for the read command
#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Service name (see `fsgate structure`)
    pub service: String,

    /// File path relative to the service root
    pub path: String,
}

/// Execute the read command
pub async fn execute(
    args: ReadArgs,
    dispatcher: &RequestDispatcher,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let params = json!({
        "service": args.service,
        "filePath": args.path,
    });

    let response = dispatcher.dispatch("read", &params).await;
    let Some(texts) = unwrap_response(response, format)? else {
        return Ok(());
    };

    let mut blocks = texts.into_iter();
    if let Some(body) = blocks.next() {
        print!("{body}");
        if !body.ends_with('\n') {
            println!();
        }
    }
    // Anything after the body is a truncation notice
    for notice in blocks {
        print_warning(&notice);
    }

    Ok(())
}
