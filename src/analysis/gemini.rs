use log::{error, info};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::analysis::{AnalysisError, AnalysisSummary, Summarizer};
use crate::config::AnalysisConfig;
use crate::domain::report::Report;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

// generateContent response
//  └── candidates[]
//       └── content
//            └── parts[]
//                 └── text   (JSON matching the response schema)

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

pub struct GeminiSummarizer {
    client: Client,
    config: AnalysisConfig,
}

impl GeminiSummarizer {
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AnalysisError::Request(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn prompt(reports: &[Report]) -> Result<String, AnalysisError> {
        let data = serde_json::to_string(reports)?;
        Ok(format!(
            "حلل المعطيات التالية الخاصة بالدواوير المتضررة وأجب باللغة العربية:\n{data}\n\n\
             المطلوب:\n\
             1. ملخص للوضع العام.\n\
             2. قائمة بالأولويات القصوى.\n\
             3. توصيات لفرق الإغاثة."
        ))
    }

    fn request_body(prompt: &str) -> Value {
        json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "summary": { "type": "STRING" },
                        "priorities": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" }
                        },
                        "recommendations": { "type": "STRING" }
                    },
                    "required": ["summary", "priorities", "recommendations"]
                }
            }
        })
    }
}

/// First candidate text, parsed as the summary object.
fn summary_from_response(body: &str) -> Result<AnalysisSummary, AnalysisError> {
    let response: GenerateResponse = serde_json::from_str(body)?;
    let text = response
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .find_map(|p| p.text)
        .ok_or(AnalysisError::EmptyResponse)?;

    Ok(serde_json::from_str(&text)?)
}

impl Summarizer for GeminiSummarizer {
    fn summarize(&self, reports: &[Report]) -> Result<AnalysisSummary, AnalysisError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AnalysisError::NotConfigured)?;
        if reports.is_empty() {
            return Err(AnalysisError::NoReports);
        }

        let url = format!("{API_BASE}/{}:generateContent", self.config.model);
        let body = Self::request_body(&Self::prompt(reports)?);

        let resp = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .map_err(|e| AnalysisError::Request(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| AnalysisError::Request(e.to_string()))?;

        if !status.is_success() {
            error!("analysis call failed with {status}");
            return Err(AnalysisError::Service {
                status: status.as_u16(),
                body: text,
            });
        }

        let summary = summary_from_response(&text)?;
        info!(
            "analysed {} reports, {} priorities",
            reports.len(),
            summary.priorities.len()
        );
        Ok(summary)
    }
}
