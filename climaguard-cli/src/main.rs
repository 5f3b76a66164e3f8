//! Binary crate for the `climaguard` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Human-friendly output formatting

use clap::Parser;
use climaguard_core::QueryError;

mod cli;
mod logger;
mod output;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    logger::init(cmd.verbose);

    if let Err(err) = cmd.run().await {
        // Request errors are already user-facing; the debug chain only shows with -v.
        if let Some(query_err) = err.downcast_ref::<QueryError>() {
            tracing::debug!(error = ?query_err, "request failed");
            eprintln!("Error: {query_err}");
            std::process::exit(if query_err.is_user_error() { 2 } else { 1 });
        }
        return Err(err);
    }

    Ok(())
}
