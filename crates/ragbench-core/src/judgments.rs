//! Ground-truth relevance judgments.
//!
//! Judgments arrive in the query file alongside the query texts:
//!
//! ```json
//! {
//!   "prompt": "Answer {query} using {contexts}",
//!   "queries": [
//!     {
//!       "text": "What is dwell time?",
//!       "relevant_docs": [
//!         {"doc": "doc1", "relevance": 3},
//!         {"doc": "doc2", "relevance": 1}
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! The outer query sequence must be index-aligned with the retrieval results:
//! position `i` in both refers to the same query. There is no query-identity
//! join key, so the caller is responsible for preserving that order and the
//! evaluation passes fail fast on a length mismatch.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{EvalError, PersistError};

/// One judged-relevant document for a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    /// Identifier of the judged document
    #[serde(rename = "doc")]
    pub doc_id: String,
    /// Graded relevance score. Required by the graded metric family,
    /// ignored by the binary families.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f64>,
}

impl Judgment {
    /// Creates a binary (ungraded) judgment.
    pub fn relevant(doc_id: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            relevance: None,
        }
    }

    /// Creates a graded judgment.
    pub fn graded(doc_id: impl Into<String>, relevance: f64) -> Self {
        Self {
            doc_id: doc_id.into(),
            relevance: Some(relevance),
        }
    }
}

/// A query with its judged-relevant documents, as read from the query file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    /// Query text sent to the retrieval pipeline
    pub text: String,
    /// Ground-truth relevant documents for this query
    pub relevant_docs: Vec<Judgment>,
}

/// The query input file: an optional shared prompt template plus the queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryFile {
    /// Prompt template with `{query}` and `{contexts}` placeholders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Queries in pipeline order
    pub queries: Vec<QuerySpec>,
}

impl QueryFile {
    /// Loads a query file from JSON.
    pub fn load(path: &Path) -> Result<Self, PersistError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Per-query ground truth, index-aligned with the retrieval results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroundTruth {
    queries: Vec<Vec<Judgment>>,
}

impl GroundTruth {
    /// Builds ground truth from per-query judgment lists.
    pub fn new(queries: Vec<Vec<Judgment>>) -> Self {
        Self { queries }
    }

    /// Extracts the ground truth from a loaded query file.
    pub fn from_query_file(file: &QueryFile) -> Self {
        Self {
            queries: file
                .queries
                .iter()
                .map(|q| q.relevant_docs.clone())
                .collect(),
        }
    }

    /// Number of judged queries.
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Returns true if no queries are judged.
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Judgments for one query.
    ///
    /// # Panics
    ///
    /// Panics if `query_index` is out of range.
    pub fn judgments(&self, query_index: usize) -> &[Judgment] {
        &self.queries[query_index]
    }

    /// Binary view: the judged-relevant identifiers per query, grades
    /// discarded.
    pub fn relevant_ids(&self) -> Vec<Vec<String>> {
        self.queries
            .iter()
            .map(|judgments| judgments.iter().map(|j| j.doc_id.clone()).collect())
            .collect()
    }

    /// Graded view: `(doc_id, grade)` pairs per query.
    ///
    /// Every judgment must carry a grade; a missing grade is a hard error
    /// rather than an implicit zero, so a half-graded ground-truth file
    /// cannot silently deflate NDCG scores.
    pub fn graded_judgments(&self) -> Result<Vec<Vec<(String, f64)>>, EvalError> {
        self.queries
            .iter()
            .enumerate()
            .map(|(query_index, judgments)| {
                judgments
                    .iter()
                    .map(|j| match j.relevance {
                        Some(grade) => Ok((j.doc_id.clone(), grade)),
                        None => Err(EvalError::MissingRelevanceGrade {
                            doc_id: j.doc_id.clone(),
                            query_index,
                        }),
                    })
                    .collect()
            })
            .collect()
    }
}
