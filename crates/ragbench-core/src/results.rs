//! Experiment result records.
//!
//! A retrieval run produces one [`RetrievalResult`] per query, collected into
//! an [`ExperimentResults`] record. Evaluation passes never mutate a record
//! in place: each pass reads the scores accumulated so far and returns a new
//! record with its own keys merged in, so a caller holding the pre-pass
//! record can still compare before/after states.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of one query against the retrieval pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// Original query text
    pub query: String,
    /// Retrieved document identifiers, best match first
    pub retrieved: Vec<String>,
    /// Prompt assembled from the query and retrieved contexts
    #[serde(default)]
    pub prompt: String,
    /// Model response text
    #[serde(default)]
    pub response: String,
    /// Per-query metric scores keyed by namespaced metric name,
    /// for example `precision@5` or `RR`
    #[serde(default)]
    pub evaluations: BTreeMap<String, f64>,
}

impl RetrievalResult {
    /// Creates a result with no evaluations attached yet.
    pub fn new(
        query: impl Into<String>,
        retrieved: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            query: query.into(),
            retrieved: retrieved.into_iter().map(Into::into).collect(),
            prompt: String::new(),
            response: String::new(),
            evaluations: BTreeMap::new(),
        }
    }

    /// Returns a copy with `scores` merged into the evaluation map.
    ///
    /// Existing keys are overwritten; passes are idempotent given identical
    /// inputs, so a recomputed key always carries the same value.
    pub fn with_evaluations(&self, scores: impl IntoIterator<Item = (String, f64)>) -> Self {
        let mut updated = self.clone();
        updated.evaluations.extend(scores);
        updated
    }
}

/// Full experiment record: one result per query plus corpus-level scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResults {
    /// Per-query results, in pipeline query order
    pub results: Vec<RetrievalResult>,
    /// Identifier of the model that generated the responses
    pub model: String,
    /// Free-form run parameters, persisted for reproducibility
    #[serde(default)]
    pub parameters: BTreeMap<String, serde_json::Value>,
    /// Completion time of the retrieval stage
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    /// Corpus-level metric scores keyed by namespaced metric name,
    /// for example `avg_precision@5` or `MRR`
    #[serde(default)]
    pub evaluations: BTreeMap<String, f64>,
}

impl ExperimentResults {
    /// Creates an empty record for the given model.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            results: Vec::new(),
            model: model.into(),
            parameters: BTreeMap::new(),
            finished_at: None,
            evaluations: BTreeMap::new(),
        }
    }

    /// Number of queries in the batch.
    pub fn num_queries(&self) -> usize {
        self.results.len()
    }

    /// Copy-on-write update: returns a new record with per-query and
    /// corpus-level scores merged in, all other fields untouched.
    ///
    /// `per_query` must be index-aligned with `results`; the evaluation
    /// passes verify alignment before computing scores.
    pub fn with_evaluations(
        &self,
        per_query: Vec<BTreeMap<String, f64>>,
        corpus: impl IntoIterator<Item = (String, f64)>,
    ) -> Self {
        debug_assert_eq!(per_query.len(), self.results.len());

        let mut updated = self.clone();
        for (result, scores) in updated.results.iter_mut().zip(per_query) {
            result.evaluations.extend(scores);
        }
        updated.evaluations.extend(corpus);
        updated
    }
}
