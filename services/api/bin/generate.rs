//! One-shot generation from the command line.
//!
//! Runs the same pipeline as `POST /api/generate` and prints the resource JSON
//! to stdout. Logs go to stderr so the output can be piped.

use anyhow::Context;
use clap::Parser;
use learnpath_api::{config::Config, state::AppState};
use learnpath_core::orchestrator::GenerateRequest;
use std::io::Write;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "generate", about = "Generate a learning resource for one topic")]
struct Cli {
    /// The topic to build a learning resource for.
    #[arg(long)]
    topic: String,

    /// Comma-separated difficulty levels.
    #[arg(long, value_delimiter = ',', default_value = "medium")]
    difficulty: Vec<String>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let request = GenerateRequest::new(&cli.topic, cli.difficulty).context("Invalid request")?;
    let state = AppState::from_config(&config)?;

    let outcome = state.resources.generate(&request).await;
    info!(tier = %outcome.tier, "Generation finished");

    let json = if cli.pretty {
        serde_json::to_string_pretty(&outcome.resource)?
    } else {
        serde_json::to_string(&outcome.resource)?
    };
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}
