//! # Ragbench Core
//!
//! Retrieval-quality evaluation for RAG (retrieval-augmented generation)
//! experiments.
//!
//! An experiment run produces one [`results::RetrievalResult`] per query: the
//! ordered list of retrieved document identifiers plus the prompt and model
//! response. This crate scores those runs against ground-truth relevance
//! judgments using standard Information Retrieval metrics and attaches the
//! scores to the result records, per query and corpus-wide.
//!
//! The retrieval stage itself (chunking, embedding, vector store, LLM calls)
//! is out of scope: the harness consumes its serialized output.
//!
//! ## Modules
//!
//! - [`eval`] - Metric calculators (Precision/Recall/F1, RR/AP, DCG/NDCG) and
//!   the evaluation pipeline that drives them
//! - [`judgments`] - Ground-truth relevance judgments and query file loading
//! - [`results`] - Experiment result records with copy-on-write score updates
//! - [`config`] - YAML configuration (metric cutoffs, report directory)
//! - [`report`] - JSON persistence for experiment results
//! - [`error`] - Error types for evaluation, configuration, and persistence

pub mod config;
pub mod error;
pub mod eval;
pub mod judgments;
pub mod report;
pub mod results;
