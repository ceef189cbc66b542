//! Graded-relevance metrics: DCG@k and NDCG@k.
//!
//! Graded metrics use per-document relevance grades instead of a binary
//! relevant/irrelevant split. The grade of a retrieved document is looked up
//! by matching its identifier against the query's judgments; a retrieved
//! document nobody judged scores grade 0.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::Evaluator;
use crate::error::EvalError;
use crate::judgments::GroundTruth;
use crate::results::ExperimentResults;

/// Log discount for a zero-based rank.
///
/// The `+2` offset maps rank 0 to `log2(2) = 1`, leaving the top rank
/// undiscounted.
fn discount(rank: usize) -> f64 {
    (rank as f64 + 2.0).log2()
}

/// Graded-relevance calculator over a full query batch.
///
/// Constructed with one judgment list per query: `(doc_id, grade)` pairs in
/// ground-truth order, which need not be rank order.
#[derive(Debug, Clone)]
pub struct GradedMetrics {
    judgments: Vec<Vec<(String, f64)>>,
}

impl GradedMetrics {
    /// Creates a calculator from validated per-query graded judgments.
    pub fn new(judgments: Vec<Vec<(String, f64)>>) -> Self {
        Self { judgments }
    }

    /// Number of queries the calculator was constructed with.
    pub fn num_queries(&self) -> usize {
        self.judgments.len()
    }

    fn grade_for(&self, query_index: usize, doc_id: &str) -> f64 {
        self.judgments[query_index]
            .iter()
            .find(|(id, _)| id == doc_id)
            .map_or(0.0, |(_, grade)| *grade)
    }

    /// Discounted Cumulative Gain at `k`: the grade of each of the first
    /// `min(k, retrieved)` documents divided by the log discount of its rank.
    ///
    /// `k == 0` yields `0.0` as the empty sum; discounting happens per term,
    /// there is no outer divisor to hit zero.
    ///
    /// # Panics
    ///
    /// Panics if `query_index` is out of range for either sequence.
    pub fn dcg_at_k(
        &self,
        retrieved_all_queries: &[Vec<String>],
        query_index: usize,
        k: usize,
    ) -> f64 {
        retrieved_all_queries[query_index]
            .iter()
            .take(k)
            .enumerate()
            .map(|(rank, doc)| self.grade_for(query_index, doc) / discount(rank))
            .sum()
    }

    /// Normalized DCG at `k`: [`Self::dcg_at_k`] divided by the ideal DCG,
    /// the query's own grades sorted descending under the same discount.
    ///
    /// Returns `0.0` when the ideal DCG is zero (no judged grades above
    /// zero, or `k == 0`) rather than dividing by zero.
    ///
    /// # Panics
    ///
    /// Panics if `query_index` is out of range for either sequence.
    pub fn ndcg_at_k(
        &self,
        retrieved_all_queries: &[Vec<String>],
        query_index: usize,
        k: usize,
    ) -> f64 {
        let dcg = self.dcg_at_k(retrieved_all_queries, query_index, k);

        let mut grades: Vec<f64> = self.judgments[query_index]
            .iter()
            .map(|(_, grade)| *grade)
            .collect();
        grades.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));

        let idcg: f64 = grades
            .iter()
            .take(k)
            .enumerate()
            .map(|(rank, grade)| grade / discount(rank))
            .sum();

        if idcg == 0.0 {
            0.0
        } else {
            dcg / idcg
        }
    }
}

/// Evaluation pass attaching `DCG@k` and `NDCG@k` to each query, plus their
/// `avg_`-prefixed corpus means.
///
/// Grade validation happens when the pass runs: a judged document without a
/// relevance grade fails the whole pass instead of silently scoring zero.
#[derive(Debug, Clone)]
pub struct GradedRelevanceEvaluator {
    truth: GroundTruth,
    k: usize,
}

impl GradedRelevanceEvaluator {
    /// Creates the pass from ground truth and the configured cutoff.
    pub fn new(truth: &GroundTruth, k: usize) -> Self {
        Self {
            truth: truth.clone(),
            k,
        }
    }
}

impl Evaluator for GradedRelevanceEvaluator {
    fn name(&self) -> &'static str {
        "graded_relevance"
    }

    fn run(&self, results: &ExperimentResults) -> Result<ExperimentResults, EvalError> {
        super::check_alignment(self.truth.len(), results)?;
        let metrics = GradedMetrics::new(self.truth.graded_judgments()?);

        let k = self.k;
        let retrieved_all: Vec<Vec<String>> = results
            .results
            .iter()
            .map(|r| r.retrieved.clone())
            .collect();

        let mut per_query = Vec::with_capacity(results.num_queries());
        let mut dcg_sum = 0.0;
        let mut ndcg_sum = 0.0;
        for i in 0..results.num_queries() {
            let dcg = metrics.dcg_at_k(&retrieved_all, i, k);
            let ndcg = metrics.ndcg_at_k(&retrieved_all, i, k);
            dcg_sum += dcg;
            ndcg_sum += ndcg;
            per_query.push(BTreeMap::from([
                (format!("DCG@{k}"), dcg),
                (format!("NDCG@{k}"), ndcg),
            ]));
        }

        let n = per_query.len() as f64;
        let corpus = [
            (format!("avg_DCG@{k}"), dcg_sum / n),
            (format!("avg_NDCG@{k}"), ndcg_sum / n),
        ];
        Ok(results.with_evaluations(per_query, corpus))
    }
}
