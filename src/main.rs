//! Answer Validator CLI
//!
//! Compares generated answers against a benchmark and writes a comparison report.

use anyhow::{Context, Result};
use answer_validator::{Params, validate_llm_responses};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Automatic validation of LLM responses against a benchmark
#[derive(Parser)]
#[command(name = "validate-responses")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to JSON configuration file
    #[arg(long, default_value = "./params.json")]
    json_path: PathBuf,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("answer_validator=debug,info")
        } else {
            EnvFilter::new("answer_validator=info,warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let params = Params::load(&cli.json_path).with_context(|| {
        format!("Failed to load parameters from {}", cli.json_path.display())
    })?;

    validate_llm_responses(&params).context("Validation failed")?;

    Ok(())
}
