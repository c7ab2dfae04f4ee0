use log::info;
use std::sync::Arc;

use crate::analysis::{GeminiSummarizer, Summarizer};
use crate::config::AppConfig;
use crate::db::{Database, ReportStore};
use crate::domain::hierarchy::HierarchyIndex;
use crate::domain::report::Report;
use crate::errors::ServerError;
use crate::feeds::{FeedCache, FeedClient, FeedNamespace, FeedOrdering, FeedSource, FeedSnapshot, HttpFeedSource};
use crate::submission::{RemoteSink, SubmissionPipeline, WebhookSink};
use crate::templates::Notice;

/// Everything a request handler needs, built once at startup and shared
/// by all workers.
pub struct AppState {
    pub config: AppConfig,
    pub store: ReportStore,
    pub feeds: FeedClient,
    pub dashboard_feed: FeedCache<Vec<Report>>,
    pub map_feed: FeedCache<Vec<Report>>,
    pub hierarchy: FeedCache<HierarchyIndex>,
    pub submissions: SubmissionPipeline,
    pub summarizer: Box<dyn Summarizer>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db: Database,
        feed_source: Box<dyn FeedSource>,
        sink: Box<dyn RemoteSink>,
        summarizer: Box<dyn Summarizer>,
    ) -> Result<Self, ServerError> {
        let store = ReportStore::load(db, config.storage_key.clone())?;
        info!("report store ready with {} local reports", store.len());

        Ok(Self {
            feeds: FeedClient::new(feed_source, config.feeds.clone()),
            store,
            dashboard_feed: FeedCache::new(),
            map_feed: FeedCache::new(),
            hierarchy: FeedCache::new(),
            submissions: SubmissionPipeline::new(sink),
            summarizer,
            config,
        })
    }

    /// Production wiring: HTTP feeds, webhook, Gemini.
    pub fn from_config(config: AppConfig, db: Database) -> Result<Self, ServerError> {
        let feed_source = HttpFeedSource::new(&config.feeds)
            .map_err(|e| ServerError::Config(format!("feed client: {e}")))?;
        let sink = WebhookSink::new(config.submission_url.clone(), config.submission_timeout)
            .map_err(|e| ServerError::Config(format!("webhook client: {e}")))?;
        let summarizer = GeminiSummarizer::new(config.analysis.clone())
            .map_err(|e| ServerError::Config(format!("analysis client: {e}")))?;

        Self::new(
            config,
            db,
            Box::new(feed_source),
            Box::new(sink),
            Box::new(summarizer),
        )
    }

    /// Location reference data, fetched on first use. A failed fetch is not
    /// cached, so the next page load tries again.
    pub fn hierarchy_index(&self) -> (Arc<HierarchyIndex>, Option<Notice>) {
        let snapshot = self
            .hierarchy
            .get_or_refresh(|| self.feeds.fetch_hierarchy().map(HierarchyIndex::new));
        let notice = snapshot
            .error
            .as_ref()
            .map(|_| Notice::warning("تعذر تحميل قائمة المواقع، يمكنك كتابة الأسماء يدوياً."));
        let index = snapshot.data.unwrap_or_default();
        (index, notice)
    }

    pub fn refresh_dashboard(&self) -> FeedSnapshot<Vec<Report>> {
        self.dashboard_feed.refresh(|| {
            self.feeds
                .fetch_reports(FeedNamespace::Remote, FeedOrdering::NewestFirst)
        })
    }

    pub fn refresh_map(&self) -> FeedSnapshot<Vec<Report>> {
        self.map_feed
            .refresh(|| self.feeds.fetch_reports(FeedNamespace::Map, FeedOrdering::AsStored))
    }

    /// Rows the dashboard last showed: the remote list if it ever loaded,
    /// otherwise the local store.
    pub fn dashboard_reports(&self) -> Vec<Report> {
        match self.dashboard_feed.current() {
            Some(reports) => reports.as_ref().clone(),
            None => self.store.all(),
        }
    }
}
