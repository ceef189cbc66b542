//! Retrieval-quality evaluation.
//!
//! Three metric families score a completed experiment against ground-truth
//! relevance judgments:
//!
//! | Family | Metrics | Per-query keys | Corpus keys |
//! |--------|---------|----------------|-------------|
//! | Order-unaware | Precision@k, Recall@k, F1@k | `precision@k`, `recall@k`, `f1@k` | `avg_precision@k`, `avg_recall@k`, `avg_f1@k` |
//! | Order-aware | RR, AP | `RR`, `AP` | `MRR`, `MAP` |
//! | Graded | DCG@k, NDCG@k | `DCG@k`, `NDCG@k` | `avg_DCG@k`, `avg_NDCG@k` |
//!
//! Each family is an [`Evaluator`] pass: it reads the scores accumulated so
//! far, computes its own, and returns a new result record with both the
//! per-query and corpus-level maps extended. Passes never depend on each
//! other's output and are each re-derivable from the raw retrieval output
//! plus ground truth, so new families can be added without recomputation.
//!
//! [`evaluate`] drives the fixed pass order:
//! order-unaware, then order-aware, then graded.
//!
//! # Example
//!
//! ```ignore
//! use ragbench_core::eval::evaluate;
//!
//! let evaluated = evaluate(&results, &truth, &config.evaluators)?;
//! println!("MAP = {:.4}", evaluated.evaluations["MAP"]);
//! ```
//!
//! # References
//!
//! - Järvelin & Kekäläinen (2002). "Cumulated gain-based evaluation of IR techniques"
//! - Manning, Raghavan & Schütze (2008). "Introduction to Information Retrieval", ch. 8

pub mod graded;
pub mod rank_metrics;
pub mod set_metrics;
pub mod stats;

pub use graded::{GradedMetrics, GradedRelevanceEvaluator};
pub use rank_metrics::{OrderAwareEvaluator, RankMetrics};
pub use set_metrics::{OrderUnawareEvaluator, SetMetrics};
pub use stats::{bootstrap_ci, ConfidenceInterval};

use tracing::{debug, info};

use crate::config::EvaluatorsConfig;
use crate::error::EvalError;
use crate::judgments::GroundTruth;
use crate::results::ExperimentResults;

/// A single evaluation pass over a completed experiment.
///
/// Passes are pure functions of the result record and the ground truth they
/// were constructed with: the same inputs always produce the same scores,
/// and rerunning a pass overwrites its own keys with identical values.
pub trait Evaluator {
    /// Short name for logging and diagnostics.
    fn name(&self) -> &'static str;

    /// Runs the pass, returning a new result record (copy-on-write) with
    /// this family's per-query and corpus-level scores merged in.
    fn run(&self, results: &ExperimentResults) -> Result<ExperimentResults, EvalError>;
}

/// Runs all three metric families over `results` in their fixed order.
///
/// Fails fast if the ground truth and the results disagree on the number of
/// queries, if a batch is empty, or if the graded pass encounters an
/// ungraded judgment. On error nothing is scored: the input record is left
/// as the caller's only copy.
pub fn evaluate(
    results: &ExperimentResults,
    truth: &GroundTruth,
    cutoffs: &EvaluatorsConfig,
) -> Result<ExperimentResults, EvalError> {
    let passes: Vec<Box<dyn Evaluator>> = vec![
        Box::new(OrderUnawareEvaluator::new(truth, cutoffs.order_unaware.k)),
        Box::new(OrderAwareEvaluator::new(truth)),
        Box::new(GradedRelevanceEvaluator::new(truth, cutoffs.graded.k)),
    ];

    info!(
        queries = results.num_queries(),
        model = %results.model,
        "Running evaluation passes"
    );

    let mut current = results.clone();
    for pass in &passes {
        debug!(pass = pass.name(), "Running evaluation pass");
        current = pass.run(&current)?;
    }
    Ok(current)
}

/// Verifies index alignment between ground truth and results.
///
/// The sequences are joined positionally, so a length mismatch means the
/// batch would be silently misscored. Also rejects the empty batch: every
/// family ends in a corpus mean, which is undefined over zero queries.
pub(crate) fn check_alignment(
    judged: usize,
    results: &ExperimentResults,
) -> Result<(), EvalError> {
    let retrieved = results.num_queries();
    if judged != retrieved {
        return Err(EvalError::Misaligned { judged, retrieved });
    }
    if retrieved == 0 {
        return Err(EvalError::InvalidArgument(
            "cannot evaluate an empty batch: corpus means are undefined over zero queries"
                .to_string(),
        ));
    }
    Ok(())
}
