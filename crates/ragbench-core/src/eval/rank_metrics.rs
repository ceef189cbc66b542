//! Order-aware (ranking) metrics: Reciprocal Rank and Average Precision,
//! with their corpus-level means MRR and MAP.
//!
//! Unlike the set metrics these reward placing relevant documents early in
//! the ranking, and they scan the full retrieved list without a cutoff.

use std::collections::{BTreeMap, HashSet};

use super::Evaluator;
use crate::error::EvalError;
use crate::judgments::GroundTruth;
use crate::results::ExperimentResults;

/// Order-aware metric calculator over a full query batch.
///
/// Constructed with one judged-relevant set per query, in query order. The
/// per-query methods take the retrieved lists for all queries plus the index
/// of the query to score, mirroring how the batch-level means consume them.
#[derive(Debug, Clone)]
pub struct RankMetrics {
    relevant: Vec<HashSet<String>>,
}

impl RankMetrics {
    /// Creates a calculator from per-query judged-relevant identifiers.
    pub fn new<I, Q, S>(relevant_per_query: I) -> Self
    where
        I: IntoIterator<Item = Q>,
        Q: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            relevant: relevant_per_query
                .into_iter()
                .map(|query| query.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Number of queries the calculator was constructed with.
    pub fn num_queries(&self) -> usize {
        self.relevant.len()
    }

    /// Reciprocal rank of the first relevant document: `1 / (1 + rank)`
    /// with `rank` zero-based, so a relevant document at the top scores 1.
    ///
    /// Returns `0.0` when no retrieved document is relevant, including for
    /// an empty retrieved list.
    ///
    /// # Panics
    ///
    /// Panics if `query_index` is out of range for either sequence.
    pub fn reciprocal_rank(
        &self,
        retrieved_all_queries: &[Vec<String>],
        query_index: usize,
    ) -> f64 {
        let relevant = &self.relevant[query_index];
        retrieved_all_queries[query_index]
            .iter()
            .position(|doc| relevant.contains(doc.as_str()))
            .map_or(0.0, |rank| 1.0 / (1.0 + rank as f64))
    }

    /// Arithmetic mean of [`Self::reciprocal_rank`] over all queries.
    ///
    /// Undefined over zero queries.
    pub fn mean_reciprocal_rank(
        &self,
        retrieved_all_queries: &[Vec<String>],
    ) -> Result<f64, EvalError> {
        if self.relevant.is_empty() {
            return Err(EvalError::InvalidArgument(
                "MRR is undefined over zero queries".to_string(),
            ));
        }
        let sum: f64 = (0..self.relevant.len())
            .map(|i| self.reciprocal_rank(retrieved_all_queries, i))
            .sum();
        Ok(sum / self.relevant.len() as f64)
    }

    /// Average Precision: precision accumulated at each relevant hit,
    /// divided by the total judged-relevant count for the query.
    ///
    /// Judged-relevant documents that were never retrieved contribute zero
    /// (the divisor is the judged count, not the hit count), which is the
    /// standard AP definition. Undefined for a query with no judged-relevant
    /// documents.
    ///
    /// # Panics
    ///
    /// Panics if `query_index` is out of range for either sequence.
    pub fn average_precision(
        &self,
        retrieved_all_queries: &[Vec<String>],
        query_index: usize,
    ) -> Result<f64, EvalError> {
        let relevant = &self.relevant[query_index];
        if relevant.is_empty() {
            return Err(EvalError::InvalidArgument(
                "AP is undefined for a query with no judged-relevant documents".to_string(),
            ));
        }

        let mut hits = 0u64;
        let mut score = 0.0;
        for (rank, doc) in retrieved_all_queries[query_index].iter().enumerate() {
            if relevant.contains(doc.as_str()) {
                hits += 1;
                score += hits as f64 / (rank as f64 + 1.0);
            }
        }
        Ok(score / relevant.len() as f64)
    }

    /// Arithmetic mean of [`Self::average_precision`] over all queries.
    pub fn mean_average_precision(
        &self,
        retrieved_all_queries: &[Vec<String>],
    ) -> Result<f64, EvalError> {
        if self.relevant.is_empty() {
            return Err(EvalError::InvalidArgument(
                "MAP is undefined over zero queries".to_string(),
            ));
        }
        let mut sum = 0.0;
        for i in 0..self.relevant.len() {
            sum += self.average_precision(retrieved_all_queries, i)?;
        }
        Ok(sum / self.relevant.len() as f64)
    }
}

/// Evaluation pass attaching `RR` and `AP` to each query, plus the corpus
/// means `MRR` and `MAP`.
#[derive(Debug, Clone)]
pub struct OrderAwareEvaluator {
    relevant: Vec<Vec<String>>,
}

impl OrderAwareEvaluator {
    /// Creates the pass from ground truth.
    pub fn new(truth: &GroundTruth) -> Self {
        Self {
            relevant: truth.relevant_ids(),
        }
    }
}

impl Evaluator for OrderAwareEvaluator {
    fn name(&self) -> &'static str {
        "order_aware"
    }

    fn run(&self, results: &ExperimentResults) -> Result<ExperimentResults, EvalError> {
        super::check_alignment(self.relevant.len(), results)?;

        let metrics = RankMetrics::new(self.relevant.iter().map(|q| q.iter().cloned()));
        let retrieved_all: Vec<Vec<String>> = results
            .results
            .iter()
            .map(|r| r.retrieved.clone())
            .collect();

        let mut per_query = Vec::with_capacity(results.num_queries());
        for i in 0..results.num_queries() {
            let rr = metrics.reciprocal_rank(&retrieved_all, i);
            let ap = metrics.average_precision(&retrieved_all, i)?;
            per_query.push(BTreeMap::from([
                ("RR".to_string(), rr),
                ("AP".to_string(), ap),
            ]));
        }

        let corpus = [
            ("MRR".to_string(), metrics.mean_reciprocal_rank(&retrieved_all)?),
            ("MAP".to_string(), metrics.mean_average_precision(&retrieved_all)?),
        ];
        Ok(results.with_evaluations(per_query, corpus))
    }
}
