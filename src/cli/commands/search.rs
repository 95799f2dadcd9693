//! Search command - literal substring search across services

use crate::cli::output::{colors, print_warning, unwrap_response};
use crate::cli::OutputFormat;
use crate::core::search::SearchOutcome;
use crate::gateway::RequestDispatcher;
use clap::Args;
use serde_json::{json, Value};

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Literal text to find (case-sensitive, single line)
    pub query: String,

    /// Restrict to file extensions, e.g. `--file-type .rs` (repeatable)
    #[arg(long = "file-type", short = 't')]
    pub file_type: Vec<String>,

    /// Maximum number of matching lines
    #[arg(long, short = 'k')]
    pub max_results: Option<u64>,

    /// Search one service instead of the whole project
    #[arg(long, short = 's')]
    pub service: Option<String>,

    /// Only show file paths (no snippets)
    #[arg(long)]
    pub files_only: bool,
}

impl SearchArgs {
    fn to_params(&self) -> Value {
        let mut params = json!({ "query": self.query });
        if !self.file_type.is_empty() {
            params["fileTypes"] = json!(self.file_type);
        }
        if let Some(max) = self.max_results {
            params["maxResults"] = json!(max);
        }
        if let Some(service) = &self.service {
            params["service"] = json!(service);
        }
        params
    }
}

/// Execute the search command
pub async fn execute(
    args: SearchArgs,
    dispatcher: &RequestDispatcher,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = dispatcher.dispatch("search", &args.to_params()).await;
    let Some(texts) = unwrap_response(response, format)? else {
        return Ok(());
    };

    let body = texts.first().map(String::as_str).unwrap_or("{}");
    let outcome: SearchOutcome = serde_json::from_str(body)?;
    print_outcome(&outcome, args.files_only);

    Ok(())
}

fn print_outcome(outcome: &SearchOutcome, files_only: bool) {
    if outcome.results.is_empty() {
        println!(
            "No matches for '{}' in {}",
            colors::label(&outcome.query),
            colors::service(&outcome.scope)
        );
    } else {
        println!(
            "Found {} match(es) in {}:\n",
            colors::number(&outcome.total.to_string()),
            colors::service(&outcome.scope)
        );
    }

    let mut last_path: Option<&str> = None;
    for result in &outcome.results {
        if files_only {
            if last_path != Some(result.path.as_str()) {
                println!("{}", colors::file_path(&result.path));
            }
        } else {
            println!(
                "{}:{}: {}",
                colors::file_path(&result.path),
                colors::line_number(&result.line.to_string()),
                result.snippet
            );
        }
        last_path = Some(result.path.as_str());
    }

    println!(
        "\n{}",
        colors::dim(&format!(
            "{} files scanned, {} too large, {} binary, {} unreadable",
            outcome.files_scanned, outcome.skipped_large, outcome.skipped_binary, outcome.unreadable
        ))
    );

    if outcome.truncated {
        print_warning("results truncated; narrow the query or raise --max-results");
    }
}
