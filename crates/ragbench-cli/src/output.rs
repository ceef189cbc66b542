//! Output formatting for evaluation summaries.
//!
//! Supports both human-readable terminal output and JSON for scripting.
//! Corpus-level means are paired with bootstrap confidence intervals
//! computed from the per-query values of the same metric.

use ragbench_core::eval::{bootstrap_ci, ConfidenceInterval};
use ragbench_core::results::ExperimentResults;
use serde::Serialize;

/// Bootstrap resamples per confidence interval.
const N_BOOTSTRAP: usize = 2000;

/// Fixed seed so repeated runs print identical intervals.
const BOOTSTRAP_SEED: u64 = 42;

/// JSON summary for one evaluated batch.
#[derive(Debug, Serialize)]
pub struct BatchSummary {
    /// Model the batch was generated with
    pub model: String,
    /// Number of queries scored
    pub num_queries: usize,
    /// Corpus-level metrics with confidence intervals
    pub metrics: Vec<MetricSummary>,
}

/// One corpus-level metric with its spread across queries.
#[derive(Debug, Serialize)]
pub struct MetricSummary {
    /// Corpus-level key, for example `avg_precision@5` or `MRR`
    pub name: String,
    /// Corpus-level mean
    pub mean: f64,
    /// Bootstrap 95% CI lower bound, absent for single-query batches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ci_lower: Option<f64>,
    /// Bootstrap 95% CI upper bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ci_upper: Option<f64>,
}

/// Maps a corpus-level key to the per-query key it averages.
///
/// `avg_`-prefixed keys strip the prefix; the mean metrics rename
/// (`MRR` averages `RR`, `MAP` averages `AP`).
fn per_query_key(corpus_key: &str) -> Option<&str> {
    match corpus_key {
        "MRR" => Some("RR"),
        "MAP" => Some("AP"),
        other => other.strip_prefix("avg_"),
    }
}

fn interval_for(batch: &ExperimentResults, corpus_key: &str) -> Option<ConfidenceInterval> {
    let key = per_query_key(corpus_key)?;
    let values: Vec<f64> = batch
        .results
        .iter()
        .filter_map(|r| r.evaluations.get(key).copied())
        .collect();
    if values.len() < 2 {
        return None;
    }
    bootstrap_ci(&values, N_BOOTSTRAP, BOOTSTRAP_SEED)
}

/// Builds the JSON summary for a set of evaluated batches.
pub fn build_summary(batches: &[ExperimentResults]) -> Vec<BatchSummary> {
    batches
        .iter()
        .map(|batch| BatchSummary {
            model: batch.model.clone(),
            num_queries: batch.num_queries(),
            metrics: batch
                .evaluations
                .iter()
                .map(|(name, &mean)| {
                    let ci = interval_for(batch, name);
                    MetricSummary {
                        name: name.clone(),
                        mean,
                        ci_lower: ci.map(|c| c.lower),
                        ci_upper: ci.map(|c| c.upper),
                    }
                })
                .collect(),
        })
        .collect()
}

/// Formats evaluated batches for the terminal.
pub fn format_human(batches: &[ExperimentResults], per_query: bool) -> String {
    let mut out = String::new();

    for batch in batches {
        out.push_str(&format!(
            "model: {} ({} queries)\n",
            batch.model,
            batch.num_queries()
        ));

        for (name, &mean) in &batch.evaluations {
            match interval_for(batch, name) {
                Some(ci) => {
                    out.push_str(&format!("  {:<18} {}\n", name, ci.format(4)));
                }
                None => {
                    out.push_str(&format!("  {:<18} {:.4}\n", name, mean));
                }
            }
        }

        if per_query {
            for (i, result) in batch.results.iter().enumerate() {
                out.push_str(&format!("\n  [{}] {}\n", i, result.query));
                for (name, value) in &result.evaluations {
                    out.push_str(&format!("    {:<16} {:.4}\n", name, value));
                }
            }
        }
        out.push('\n');
    }

    out
}
