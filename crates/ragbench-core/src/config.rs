//! Experiment configuration.
//!
//! Configuration lives in a YAML file (`config.yaml` by convention) and is
//! deserialized into typed structs. Only the sections the evaluation harness
//! consumes are modeled here; the retrieval stage keeps its own settings.
//!
//! The order-unaware and graded metric families take independent cutoffs:
//!
//! ```yaml
//! evaluators:
//!   order_unaware:
//!     k: 5
//!   graded:
//!     k: 10
//! report:
//!   dir: reports
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Default directory for evaluation reports.
const DEFAULT_REPORT_DIR: &str = "reports";

/// Top-level harness configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RagbenchConfig {
    /// Metric cutoffs per evaluator family
    pub evaluators: EvaluatorsConfig,
    /// Report output settings
    #[serde(default)]
    pub report: ReportConfig,
}

/// Cutoff configuration for the metric families that truncate the ranking.
///
/// The order-aware family (RR/AP) always scans the full retrieved list and
/// takes no cutoff.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluatorsConfig {
    /// Cutoff for Precision@k, Recall@k, F1@k
    pub order_unaware: CutoffConfig,
    /// Cutoff for DCG@k, NDCG@k
    pub graded: CutoffConfig,
}

/// A single `@k` cutoff.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CutoffConfig {
    /// Rank cutoff, must be at least 1
    pub k: usize,
}

/// Report output settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Directory evaluation reports are written to
    #[serde(default = "default_report_dir")]
    pub dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dir: default_report_dir(),
        }
    }
}

fn default_report_dir() -> PathBuf {
    PathBuf::from(DEFAULT_REPORT_DIR)
}

impl RagbenchConfig {
    /// Loads and validates the configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?;
        let cfg: RagbenchConfig = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Rejects cutoff values the metric definitions cannot support.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.evaluators.order_unaware.k == 0 {
            return Err(ConfigError::Invalid(
                "evaluators.order_unaware.k must be at least 1".to_string(),
            ));
        }
        if self.evaluators.graded.k == 0 {
            return Err(ConfigError::Invalid(
                "evaluators.graded.k must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
