//! Order-unaware (set) metrics: Precision@k, Recall@k, F1@k.
//!
//! These metrics treat the top-k retrieved documents as a set; rank order
//! within the cutoff never matters.

use std::collections::{BTreeMap, HashSet};

use super::Evaluator;
use crate::error::EvalError;
use crate::judgments::GroundTruth;
use crate::results::ExperimentResults;

/// Order-unaware metric calculator for a single query.
///
/// Holds the judged-relevant identifiers as a set; duplicate identifiers in
/// the input are harmless.
#[derive(Debug, Clone)]
pub struct SetMetrics {
    relevant: HashSet<String>,
}

impl SetMetrics {
    /// Creates a calculator from the judged-relevant identifiers of one query.
    pub fn new<I, S>(relevant: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            relevant: relevant.into_iter().map(Into::into).collect(),
        }
    }

    fn relevant_in_top_k(&self, retrieved: &[String], k: usize) -> usize {
        retrieved
            .iter()
            .take(k)
            .filter(|doc| self.relevant.contains(doc.as_str()))
            .count()
    }

    /// Fraction of the first `k` retrieved documents that are relevant.
    ///
    /// Divides by `k`, not by the number actually retrieved: a list shorter
    /// than `k` is scored as if the missing tail were irrelevant, the
    /// standard IR convention. `k == 0` is undefined.
    pub fn precision_at_k(&self, retrieved: &[String], k: usize) -> Result<f64, EvalError> {
        if k == 0 {
            return Err(EvalError::InvalidArgument(
                "precision@k requires k >= 1".to_string(),
            ));
        }
        Ok(self.relevant_in_top_k(retrieved, k) as f64 / k as f64)
    }

    /// Fraction of all judged-relevant documents found in the first `k`.
    ///
    /// Undefined when the query has no judged-relevant documents.
    pub fn recall_at_k(&self, retrieved: &[String], k: usize) -> Result<f64, EvalError> {
        if self.relevant.is_empty() {
            return Err(EvalError::InvalidArgument(
                "recall@k is undefined for a query with no judged-relevant documents"
                    .to_string(),
            ));
        }
        Ok(self.relevant_in_top_k(retrieved, k) as f64 / self.relevant.len() as f64)
    }

    /// Harmonic mean of precision@k and recall@k.
    ///
    /// Returns `0.0` when precision and recall are both zero; the harmonic
    /// mean is undefined there and zero is the conventional substitute.
    pub fn f1_at_k(&self, retrieved: &[String], k: usize) -> Result<f64, EvalError> {
        let precision = self.precision_at_k(retrieved, k)?;
        let recall = self.recall_at_k(retrieved, k)?;
        if precision + recall == 0.0 {
            return Ok(0.0);
        }
        Ok(2.0 * precision * recall / (precision + recall))
    }
}

/// Evaluation pass attaching `precision@k`, `recall@k`, and `f1@k` to each
/// query, plus their `avg_`-prefixed corpus means.
#[derive(Debug, Clone)]
pub struct OrderUnawareEvaluator {
    relevant: Vec<Vec<String>>,
    k: usize,
}

impl OrderUnawareEvaluator {
    /// Creates the pass from ground truth and the configured cutoff.
    pub fn new(truth: &GroundTruth, k: usize) -> Self {
        Self {
            relevant: truth.relevant_ids(),
            k,
        }
    }
}

impl Evaluator for OrderUnawareEvaluator {
    fn name(&self) -> &'static str {
        "order_unaware"
    }

    fn run(&self, results: &ExperimentResults) -> Result<ExperimentResults, EvalError> {
        super::check_alignment(self.relevant.len(), results)?;

        let k = self.k;
        let mut per_query = Vec::with_capacity(results.num_queries());
        let mut precision_sum = 0.0;
        let mut recall_sum = 0.0;
        let mut f1_sum = 0.0;

        for (relevant, result) in self.relevant.iter().zip(&results.results) {
            let metrics = SetMetrics::new(relevant.iter().cloned());
            let precision = metrics.precision_at_k(&result.retrieved, k)?;
            let recall = metrics.recall_at_k(&result.retrieved, k)?;
            let f1 = metrics.f1_at_k(&result.retrieved, k)?;

            precision_sum += precision;
            recall_sum += recall;
            f1_sum += f1;
            per_query.push(BTreeMap::from([
                (format!("precision@{k}"), precision),
                (format!("recall@{k}"), recall),
                (format!("f1@{k}"), f1),
            ]));
        }

        let n = per_query.len() as f64;
        let corpus = [
            (format!("avg_precision@{k}"), precision_sum / n),
            (format!("avg_recall@{k}"), recall_sum / n),
            (format!("avg_f1@{k}"), f1_sum / n),
        ];
        Ok(results.with_evaluations(per_query, corpus))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judgments::Judgment;
    use crate::results::RetrievalResult;

    fn docs(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_precision_at_k() {
        let metrics = SetMetrics::new(["doc1", "doc2", "doc3"]);
        let retrieved = docs(&["doc1", "doc4", "doc3"]);

        // Two of the top three are relevant
        let precision = metrics.precision_at_k(&retrieved, 3).unwrap();
        assert!((precision - 2.0 / 3.0).abs() < 1e-9);

        // Only the first is relevant within the top two
        let precision = metrics.precision_at_k(&retrieved, 2).unwrap();
        assert!((precision - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_precision_short_list_still_divides_by_k() {
        let metrics = SetMetrics::new(["doc1", "doc2", "doc3"]);
        let retrieved = docs(&["doc1", "doc4"]);

        // One relevant hit out of k = 3, even though only two were retrieved
        let precision = metrics.precision_at_k(&retrieved, 3).unwrap();
        assert!((precision - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_precision_at_zero_is_invalid() {
        let metrics = SetMetrics::new(["doc1"]);
        let err = metrics.precision_at_k(&docs(&["doc1"]), 0).unwrap_err();
        assert!(matches!(err, EvalError::InvalidArgument(_)));
    }

    #[test]
    fn test_recall_at_k() {
        let metrics = SetMetrics::new(["doc1", "doc2", "doc3"]);
        let retrieved = docs(&["doc1", "doc4", "doc3"]);

        let recall = metrics.recall_at_k(&retrieved, 3).unwrap();
        assert!((recall - 2.0 / 3.0).abs() < 1e-9);

        let recall = metrics.recall_at_k(&retrieved, 1).unwrap();
        assert!((recall - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_recall_without_relevant_docs_is_invalid() {
        let metrics = SetMetrics::new(Vec::<String>::new());
        let err = metrics.recall_at_k(&docs(&["doc1"]), 3).unwrap_err();
        assert!(matches!(err, EvalError::InvalidArgument(_)));
    }

    #[test]
    fn test_f1_at_k_harmonic_mean() {
        let metrics = SetMetrics::new(["doc1", "doc2", "doc3"]);
        let retrieved = docs(&["doc1", "doc4", "doc3"]);

        // P = R = 2/3, so F1 = 2/3
        let f1 = metrics.f1_at_k(&retrieved, 3).unwrap();
        assert!((f1 - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_f1_zero_when_nothing_relevant_retrieved() {
        let metrics = SetMetrics::new(["doc1", "doc2"]);
        let f1 = metrics.f1_at_k(&docs(&["doc7", "doc8"]), 2).unwrap();
        assert_eq!(f1, 0.0);
    }

    #[test]
    fn test_duplicate_judgments_are_harmless() {
        let deduped = SetMetrics::new(["doc1", "doc2"]);
        let duplicated = SetMetrics::new(["doc1", "doc2", "doc1"]);
        let retrieved = docs(&["doc1", "doc3"]);

        assert_eq!(
            deduped.recall_at_k(&retrieved, 2).unwrap(),
            duplicated.recall_at_k(&retrieved, 2).unwrap()
        );
    }

    #[test]
    fn test_evaluator_pass_writes_keys_and_averages() {
        let truth = GroundTruth::new(vec![
            vec![Judgment::relevant("doc1"), Judgment::relevant("doc2")],
            vec![Judgment::relevant("doc5")],
        ]);
        let mut record = ExperimentResults::new("test-model");
        record.results = vec![
            RetrievalResult::new("q1", ["doc1", "doc3"]),
            RetrievalResult::new("q2", ["doc5", "doc6"]),
        ];

        let pass = OrderUnawareEvaluator::new(&truth, 2);
        let evaluated = pass.run(&record).unwrap();

        assert!((evaluated.results[0].evaluations["precision@2"] - 0.5).abs() < 1e-9);
        assert!((evaluated.results[1].evaluations["precision@2"] - 0.5).abs() < 1e-9);
        assert!((evaluated.results[0].evaluations["recall@2"] - 0.5).abs() < 1e-9);
        assert!((evaluated.results[1].evaluations["recall@2"] - 1.0).abs() < 1e-9);
        assert!((evaluated.evaluations["avg_precision@2"] - 0.5).abs() < 1e-9);
        assert!((evaluated.evaluations["avg_recall@2"] - 0.75).abs() < 1e-9);
    }
}
