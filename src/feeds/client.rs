// client.rs
use log::{info, warn};
use reqwest::blocking::Client;
use std::collections::BTreeSet;
use std::time::Instant;

use crate::config::FeedConfig;
use crate::domain::hierarchy::HierarchyRow;
use crate::domain::report::Report;
use crate::feeds::columns::ReportColumns;
use crate::feeds::envelope::parse_feed;
use crate::feeds::models::FeedTable;
use crate::feeds::FeedError;

const USER_AGENT: &str = concat!("douar-relief/", env!("CARGO_PKG_VERSION"));

/// Raw text transport for the spreadsheet exports.
pub trait FeedSource: Send + Sync {
    fn fetch_text(&self, url: &str) -> Result<String, FeedError>;
}

pub struct HttpFeedSource {
    client: Client,
}

impl HttpFeedSource {
    pub fn new(config: &FeedConfig) -> Result<Self, FeedError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| FeedError::Network(e.to_string()))?;

        Ok(Self { client })
    }
}

impl FeedSource for HttpFeedSource {
    fn fetch_text(&self, url: &str) -> Result<String, FeedError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| FeedError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        resp.text().map_err(|e| FeedError::Network(e.to_string()))
    }
}

/// Source prefix of synthesized report ids, e.g. `remote-3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedNamespace {
    Remote,
    Map,
}

impl FeedNamespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedNamespace::Remote => "remote",
            FeedNamespace::Map => "map",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOrdering {
    /// Sheet append order reversed, for the dashboard.
    NewestFirst,
    /// Sheet order, for the map where order is irrelevant.
    AsStored,
}

/// Rows of the reports sheet as typed reports.
pub fn reports_from_table(
    table: &FeedTable,
    columns: &ReportColumns,
    namespace: FeedNamespace,
    ordering: FeedOrdering,
) -> Vec<Report> {
    let mut reports: Vec<Report> = table
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| columns.map_row(row, format!("{}-{index}", namespace.as_str())))
        .collect();

    if ordering == FeedOrdering::NewestFirst {
        reports.reverse();
    }
    reports
}

/// Distinct non-empty values of the first column, sorted.
pub fn provinces_from_table(table: &FeedTable) -> Vec<String> {
    let distinct: BTreeSet<String> = table
        .rows
        .iter()
        .filter_map(|row| row.text(0))
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();
    distinct.into_iter().collect()
}

pub struct FeedClient {
    source: Box<dyn FeedSource>,
    config: FeedConfig,
}

impl FeedClient {
    pub fn new(source: Box<dyn FeedSource>, config: FeedConfig) -> Self {
        Self { source, config }
    }

    /// GET, strip the envelope, parse.
    pub fn fetch_table(&self, url: &str) -> Result<FeedTable, FeedError> {
        let start = Instant::now();
        let result = self
            .source
            .fetch_text(url)
            .and_then(|text| parse_feed(&text, &self.config.envelope));

        match &result {
            Ok(table) => info!(
                "feed {url}: {} rows in {:?}",
                table.rows.len(),
                start.elapsed()
            ),
            Err(e) => warn!("feed {url} failed after {:?}: {e}", start.elapsed()),
        }
        result
    }

    pub fn fetch_reports(
        &self,
        namespace: FeedNamespace,
        ordering: FeedOrdering,
    ) -> Result<Vec<Report>, FeedError> {
        let table = self.fetch_table(&self.config.reports_url())?;
        Ok(reports_from_table(
            &table,
            &self.config.report_columns,
            namespace,
            ordering,
        ))
    }

    pub fn fetch_provinces(&self) -> Result<Vec<String>, FeedError> {
        let table = self.fetch_table(&self.config.provinces_url())?;
        Ok(provinces_from_table(&table))
    }

    /// Hierarchy rows; without a hierarchy sheet, one province-only row per
    /// entry of the province list.
    pub fn fetch_hierarchy(&self) -> Result<Vec<HierarchyRow>, FeedError> {
        match self.config.hierarchy_url() {
            Some(url) => {
                let table = self.fetch_table(&url)?;
                let columns = self.config.hierarchy_columns;
                Ok(table.rows.iter().map(|row| columns.map_row(row)).collect())
            }
            None => Ok(self
                .fetch_provinces()?
                .into_iter()
                .map(|province| HierarchyRow::new("", &province, "", ""))
                .collect()),
        }
    }
}
