//! End-to-end tests for the evaluation pipeline.
//!
//! These exercise the full workflow the CLI drives: load a query file with
//! ground-truth judgments, load a retrieval-results batch, run all three
//! metric passes, and persist the evaluated report.

use std::io::Write;

use ragbench_core::config::{CutoffConfig, EvaluatorsConfig};
use ragbench_core::eval::evaluate;
use ragbench_core::judgments::{GroundTruth, QueryFile};
use ragbench_core::report::{load_results, save_results};
use ragbench_core::results::{ExperimentResults, RetrievalResult};

const QUERY_FILE_JSON: &str = r#"{
    "prompt": "Answer {query} using {contexts}",
    "queries": [
        {
            "text": "what is dwell time?",
            "relevant_docs": [
                {"doc": "doc1", "relevance": 3},
                {"doc": "doc2", "relevance": 2},
                {"doc": "doc3", "relevance": 1}
            ]
        },
        {
            "text": "how are sessions merged?",
            "relevant_docs": [
                {"doc": "doc4", "relevance": 2}
            ]
        }
    ]
}"#;

const RESULTS_JSON: &str = r#"[
    {
        "results": [
            {
                "query": "what is dwell time?",
                "retrieved": ["doc1", "doc4", "doc3"],
                "prompt": "Answer ...",
                "response": "Dwell time is ..."
            },
            {
                "query": "how are sessions merged?",
                "retrieved": ["doc4", "doc5", "doc6"],
                "prompt": "Answer ...",
                "response": "Sessions are merged ..."
            }
        ],
        "model": "gpt-4o-mini",
        "parameters": {"temperature": 0.2},
        "finished_at": "2026-08-24T10:30:00Z"
    }
]"#;

fn cutoffs(order_unaware: usize, graded: usize) -> EvaluatorsConfig {
    EvaluatorsConfig {
        order_unaware: CutoffConfig { k: order_unaware },
        graded: CutoffConfig { k: graded },
    }
}

fn load_fixture() -> (GroundTruth, Vec<ExperimentResults>) {
    let mut query_file = tempfile::NamedTempFile::new().unwrap();
    query_file.write_all(QUERY_FILE_JSON.as_bytes()).unwrap();
    let queries = QueryFile::load(query_file.path()).unwrap();
    let truth = GroundTruth::from_query_file(&queries);

    let mut results_file = tempfile::NamedTempFile::new().unwrap();
    results_file.write_all(RESULTS_JSON.as_bytes()).unwrap();
    let batches = load_results(results_file.path()).unwrap();

    (truth, batches)
}

#[test]
fn full_pipeline_scores_match_hand_computation() {
    let (truth, batches) = load_fixture();
    let evaluated = evaluate(&batches[0], &truth, &cutoffs(3, 3)).unwrap();

    // Query 1: relevant {doc1, doc2, doc3}, retrieved [doc1, doc4, doc3]
    let q1 = &evaluated.results[0].evaluations;
    assert!((q1["precision@3"] - 2.0 / 3.0).abs() < 1e-9);
    assert!((q1["recall@3"] - 2.0 / 3.0).abs() < 1e-9);
    assert!((q1["f1@3"] - 2.0 / 3.0).abs() < 1e-9);
    assert!((q1["RR"] - 1.0).abs() < 1e-9);
    // Hits at ranks 1 and 3 over three judged-relevant docs
    assert!((q1["AP"] - (1.0 + 2.0 / 3.0) / 3.0).abs() < 1e-9);
    // Grades by identifier: doc1=3 at rank 0, doc4 unjudged, doc3=1 at rank 2
    let q1_dcg = 3.0 + 1.0 / 4.0_f64.log2();
    assert!((q1["DCG@3"] - q1_dcg).abs() < 1e-9);
    let q1_idcg = 3.0 + 2.0 / 3.0_f64.log2() + 1.0 / 4.0_f64.log2();
    assert!((q1["NDCG@3"] - q1_dcg / q1_idcg).abs() < 1e-9);

    // Query 2: relevant {doc4}, retrieved [doc4, doc5, doc6]
    let q2 = &evaluated.results[1].evaluations;
    assert!((q2["precision@3"] - 1.0 / 3.0).abs() < 1e-9);
    assert!((q2["recall@3"] - 1.0).abs() < 1e-9);
    assert!((q2["RR"] - 1.0).abs() < 1e-9);
    assert!((q2["AP"] - 1.0).abs() < 1e-9);
    assert!((q2["DCG@3"] - 2.0).abs() < 1e-9);
    assert!((q2["NDCG@3"] - 1.0).abs() < 1e-9);

    // Corpus means
    assert!((evaluated.evaluations["MRR"] - 1.0).abs() < 1e-9);
    assert!(
        (evaluated.evaluations["avg_precision@3"] - (2.0 / 3.0 + 1.0 / 3.0) / 2.0).abs()
            < 1e-9
    );
}

#[test]
fn evaluated_report_survives_persistence_and_rescoring() {
    let (truth, batches) = load_fixture();
    let config = cutoffs(3, 3);
    let evaluated: Vec<ExperimentResults> = batches
        .iter()
        .map(|b| evaluate(b, &truth, &config).unwrap())
        .collect();

    let dir = tempfile::tempdir().unwrap();
    let path = save_results(&evaluated, dir.path()).unwrap();
    let reloaded = load_results(&path).unwrap();
    assert_eq!(reloaded, evaluated);

    // Rerunning the passes over an already-scored report changes nothing
    let rescored = evaluate(&reloaded[0], &truth, &config).unwrap();
    assert_eq!(rescored.evaluations, evaluated[0].evaluations);
}

#[test]
fn pass_order_does_not_affect_family_scores() {
    use ragbench_core::eval::{
        Evaluator, GradedRelevanceEvaluator, OrderAwareEvaluator, OrderUnawareEvaluator,
    };

    let (truth, batches) = load_fixture();
    let forward = evaluate(&batches[0], &truth, &cutoffs(3, 3)).unwrap();

    // Passes are independent, so running them in reverse yields the same maps
    let passes: Vec<Box<dyn Evaluator>> = vec![
        Box::new(GradedRelevanceEvaluator::new(&truth, 3)),
        Box::new(OrderAwareEvaluator::new(&truth)),
        Box::new(OrderUnawareEvaluator::new(&truth, 3)),
    ];
    let mut reversed = batches[0].clone();
    for pass in &passes {
        reversed = pass.run(&reversed).unwrap();
    }

    assert_eq!(forward.evaluations, reversed.evaluations);
    for (a, b) in forward.results.iter().zip(&reversed.results) {
        assert_eq!(a.evaluations, b.evaluations);
    }
}
