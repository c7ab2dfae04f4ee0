// config.rs
use log::warn;
use std::str::FromStr;
use std::time::Duration;

use crate::feeds::columns::{HierarchyColumns, ReportColumns};

const GVIZ_BASE: &str = "https://docs.google.com/spreadsheets/d";

const DEFAULT_SUBMISSION_URL: &str = "https://script.google.com/macros/s/AKfycbxNOHHaQ9fp5hKSHhDu4dM5mb1HI2kTV8UnLp3_ZcySraEi9I96PUfN9gELeWWkEd0-/exec";

/// Character counts of the non-JSON wrapper the gviz endpoint puts around
/// its payload (`/*O_o*/\ngoogle.visualization.Query.setResponse(` ... `);`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeConfig {
    pub prefix_chars: usize,
    pub suffix_chars: usize,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            prefix_chars: 47,
            suffix_chars: 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub reports_sheet_id: String,
    pub provinces_sheet_id: String,
    /// No hierarchy sheet means the location picker is built from the
    /// province list alone.
    pub hierarchy_sheet_id: Option<String>,
    pub envelope: EnvelopeConfig,
    pub report_columns: ReportColumns,
    pub hierarchy_columns: HierarchyColumns,
    pub timeout: Duration,
}

impl FeedConfig {
    pub fn reports_url(&self) -> String {
        sheet_url(&self.reports_sheet_id)
    }

    pub fn provinces_url(&self) -> String {
        sheet_url(&self.provinces_sheet_id)
    }

    pub fn hierarchy_url(&self) -> Option<String> {
        self.hierarchy_sheet_id.as_deref().map(sheet_url)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            reports_sheet_id: "1OYnXOT8V9cV37HCsBeQ_o_ICMf4euKJ-0MgboQZbB30".to_string(),
            provinces_sheet_id: "17xE9i0PhTYIOgtGr7S9VPbtbnH7firq6K8iihd02uZA".to_string(),
            hierarchy_sheet_id: None,
            envelope: EnvelopeConfig::default(),
            report_columns: ReportColumns::default(),
            hierarchy_columns: HierarchyColumns::default(),
            timeout: Duration::from_secs(15),
        }
    }
}

/// Export URL of a sheet in the gviz JSON format.
pub fn sheet_url(sheet_id: &str) -> String {
    format!("{GVIZ_BASE}/{sheet_id}/gviz/tq?tqx=out:json")
}

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-3-flash-preview".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub max_workers: usize,
    pub database_path: String,
    pub schema_path: String,
    /// Key of the durable slot holding the report collection.
    pub storage_key: String,
    pub feeds: FeedConfig,
    pub submission_url: String,
    pub submission_timeout: Duration,
    pub analysis: AnalysisConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            max_workers: 8,
            database_path: "relief.sqlite3".to_string(),
            schema_path: "sql/schema.sql".to_string(),
            storage_key: "village_reports".to_string(),
            feeds: FeedConfig::default(),
            submission_url: DEFAULT_SUBMISSION_URL.to_string(),
            submission_timeout: Duration::from_secs(10),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by whatever is set in the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        let text = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = text("BIND_ADDR") {
            cfg.bind_addr = v;
        }
        cfg.max_workers = parsed(&lookup, "MAX_WORKERS", cfg.max_workers);
        if let Some(v) = text("DATABASE_PATH") {
            cfg.database_path = v;
        }
        if let Some(v) = text("SCHEMA_PATH") {
            cfg.schema_path = v;
        }
        if let Some(v) = text("STORAGE_KEY") {
            cfg.storage_key = v;
        }

        if let Some(v) = text("REPORTS_SHEET_ID") {
            cfg.feeds.reports_sheet_id = v;
        }
        if let Some(v) = text("PROVINCES_SHEET_ID") {
            cfg.feeds.provinces_sheet_id = v;
        }
        cfg.feeds.hierarchy_sheet_id = text("HIERARCHY_SHEET_ID");
        cfg.feeds.envelope.prefix_chars =
            parsed(&lookup, "FEED_ENVELOPE_PREFIX", cfg.feeds.envelope.prefix_chars);
        cfg.feeds.envelope.suffix_chars =
            parsed(&lookup, "FEED_ENVELOPE_SUFFIX", cfg.feeds.envelope.suffix_chars);
        cfg.feeds.timeout = Duration::from_secs(parsed(
            &lookup,
            "FEED_TIMEOUT_SECS",
            cfg.feeds.timeout.as_secs(),
        ));

        if let Some(v) = text("SUBMISSION_URL") {
            cfg.submission_url = v;
        }
        cfg.submission_timeout = Duration::from_secs(parsed(
            &lookup,
            "SUBMISSION_TIMEOUT_SECS",
            cfg.submission_timeout.as_secs(),
        ));

        cfg.analysis.api_key = text("GEMINI_API_KEY");
        if let Some(v) = text("GEMINI_MODEL") {
            cfg.analysis.model = v;
        }

        cfg
    }
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                warn!("ignoring {key}={raw:?}: not a valid number");
                default
            }
        },
        None => default,
    }
}
