mod gemini;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::report::Report;

pub use gemini::GeminiSummarizer;

/// Condensed view of the report collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub summary: String,
    pub priorities: Vec<String>,
    pub recommendations: String,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analysis is not configured (no API key)")]
    NotConfigured,
    #[error("nothing to analyse")]
    NoReports,
    #[error("request failed: {0}")]
    Request(String),
    #[error("analysis service returned {status}: {body}")]
    Service { status: u16, body: String },
    #[error("analysis service returned no content")]
    EmptyResponse,
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait Summarizer: Send + Sync {
    fn summarize(&self, reports: &[Report]) -> Result<AnalysisSummary, AnalysisError>;
}
