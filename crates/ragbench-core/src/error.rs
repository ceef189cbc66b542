//! Error types for ragbench-core.
//!
//! Evaluation errors are deterministic input-validation failures: a malformed
//! batch is never partially scored, the pass fails and the caller aborts the
//! run instead of emitting a corrupted report.

use thiserror::Error;

/// Errors raised by the metric calculators and evaluation passes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A mathematically undefined computation was requested, such as
    /// precision at `k = 0`, recall for a query with no judged-relevant
    /// documents, or a mean over zero queries.
    ///
    /// Distinct from the defined zero-result cases (no relevant document
    /// retrieved yields a score of `0.0`, not an error).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Ground truth and retrieval results disagree on the number of queries.
    ///
    /// The two sequences are joined by index, so a length mismatch would
    /// silently score queries against the wrong judgments.
    #[error("Ground truth covers {judged} queries but results contain {retrieved}")]
    Misaligned {
        /// Number of queries in the ground truth
        judged: usize,
        /// Number of queries in the retrieval results
        retrieved: usize,
    },
    /// A judged document carries no relevance grade while graded metrics
    /// were requested.
    #[error("Document `{doc_id}` in query {query_index} has no relevance grade")]
    MissingRelevanceGrade {
        /// Identifier of the ungraded document
        doc_id: String,
        /// Zero-based index of the query it was judged for
        query_index: usize,
    },
}

/// Errors that can occur while loading the experiment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or parsed
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    /// The configuration parsed but carries an unusable value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors that can occur while reading or writing JSON artifacts
/// (query files, retrieval results, evaluation reports).
#[derive(Debug, Error)]
pub enum PersistError {
    /// Filesystem read or write failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization or deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
