//! Ragbench CLI - score RAG retrieval runs against ground-truth judgments.
//!
//! # Usage
//!
//! ```bash
//! # Evaluate a saved retrieval run
//! ragbench results_2026-08-24_10-30-00.json
//!
//! # Custom config, query file, and output directory
//! ragbench run.json -c config.yaml -q prompts_queries.json --out reports
//!
//! # Per-query breakdown, or JSON for scripting
//! ragbench run.json --per-query
//! ragbench run.json --json
//! ```

mod output;

use anyhow::{Context, Result};
use clap::Parser;
use ragbench_core::config::RagbenchConfig;
use ragbench_core::eval::evaluate;
use ragbench_core::judgments::{GroundTruth, QueryFile};
use ragbench_core::report::{load_results, save_results};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Ragbench retrieval-evaluation harness.
///
/// Loads a retrieval-results batch produced by the experiment pipeline,
/// scores every query against the ground-truth judgments in the query file,
/// and writes the evaluated report back out as JSON.
#[derive(Parser)]
#[command(name = "ragbench", version, about)]
struct Cli {
    /// Retrieval results file (JSON batch from the retrieval stage)
    results: PathBuf,

    /// Query file with ground-truth relevance judgments
    #[arg(short, long, default_value = "prompts_queries.json")]
    queries: PathBuf,

    /// Configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Output directory for the evaluated report (default: config `report.dir`)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Show per-query breakdown
    #[arg(long)]
    per_query: bool,

    /// Output the summary as JSON
    #[arg(long)]
    json: bool,

    /// Skip writing the evaluated report to disk
    #[arg(long)]
    no_save: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = RagbenchConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    let query_file = QueryFile::load(&cli.queries)
        .with_context(|| format!("Failed to load query file from {}", cli.queries.display()))?;
    let truth = GroundTruth::from_query_file(&query_file);

    let batches = load_results(&cli.results).with_context(|| {
        format!(
            "Failed to load retrieval results from {}",
            cli.results.display()
        )
    })?;

    let mut evaluated = Vec::with_capacity(batches.len());
    for batch in &batches {
        evaluated.push(
            evaluate(batch, &truth, &config.evaluators)
                .with_context(|| format!("Evaluation failed for model `{}`", batch.model))?,
        );
    }

    if cli.json {
        let summary = output::build_summary(&evaluated);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", output::format_human(&evaluated, cli.per_query));
    }

    if !cli.no_save {
        let out_dir = cli.out.unwrap_or_else(|| config.report.dir.clone());
        let path = save_results(&evaluated, &out_dir).context("Failed to save report")?;
        eprintln!("Saved evaluated report to {}", path.display());
    }

    Ok(())
}
