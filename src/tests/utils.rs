use crate::analysis::{AnalysisError, AnalysisSummary, Summarizer};
use crate::config::{sheet_url, AppConfig};
use crate::db::connection::{init_db, Database};
use crate::domain::report::Report;
use crate::feeds::{FeedError, FeedSource};
use crate::state::AppState;
use crate::submission::{RemotePayload, RemoteSink, SyncWarning};
use astra::{Body, Request, Response};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

pub const HIERARCHY_SHEET: &str = "hierarchy-sheet";

/// Returns a fresh test database using the production schema
pub fn make_db() -> Database {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let path = std::env::temp_dir().join(format!(
        "relief_test_{}_{}.sqlite",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos(),
        COUNTER.fetch_add(1, Ordering::SeqCst)
    ));
    let db = Database::new(path.to_string_lossy().to_string());
    init_db(&db, "sql/schema.sql").expect("Failed to initialize DB");
    db
}

/// Wraps a JSON payload the way the gviz endpoint does.
pub fn envelope(json: &str) -> String {
    format!("/*O_o*/\ngoogle.visualization.Query.setResponse({json});")
}

/// Envelope-wrapped gviz response with the given rows.
pub fn gviz_body(rows: Vec<Value>) -> String {
    let payload = json!({
        "version": "0.6",
        "reqId": "0",
        "status": "ok",
        "sig": "1",
        "table": { "cols": [], "rows": rows, "parsedNumHeaders": 0 }
    });
    envelope(&payload.to_string())
}

/// A row of string cells; `None` becomes a null cell.
pub fn text_row(cells: &[Option<&str>]) -> Value {
    let c: Vec<Value> = cells
        .iter()
        .map(|cell| match cell {
            Some(v) => json!({ "v": v }),
            None => Value::Null,
        })
        .collect();
    json!({ "c": c })
}

pub fn report_row(village: &str, province: &str, level: &str, lat: Option<f64>, lng: Option<f64>) -> Value {
    json!({ "c": [
        { "v": "Date(2024,0,1)" },
        { "v": village },
        { "v": province },
        { "v": "Commune" },
        { "v": "Collapse" },
        { "v": level },
        { "v": "Tents" },
        { "v": 212600000 },
        null,
        { "v": lat },
        { "v": lng }
    ]})
}

/// Canned responses keyed by URL; unknown URLs fail like a dead network.
#[derive(Default)]
pub struct StaticFeed {
    responses: Mutex<HashMap<String, Result<String, FeedError>>>,
    pub calls: AtomicUsize,
}

impl StaticFeed {
    pub fn with(self, url: String, body: Result<String, FeedError>) -> Self {
        if let Ok(mut map) = self.responses.lock() {
            map.insert(url, body);
        }
        self
    }

    pub fn set(&self, url: String, body: Result<String, FeedError>) {
        self.responses.lock().unwrap().insert(url, body);
    }
}

impl FeedSource for StaticFeed {
    fn fetch_text(&self, url: &str) -> Result<String, FeedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(FeedError::Network(format!("no fixture for {url}"))))
    }
}

impl<T: FeedSource + ?Sized> FeedSource for Arc<T> {
    fn fetch_text(&self, url: &str) -> Result<String, FeedError> {
        (**self).fetch_text(url)
    }
}

/// Records every payload; optionally fails like an unreachable host.
#[derive(Default)]
pub struct RecordingSink {
    pub fail: bool,
    pub payloads: Mutex<Vec<RemotePayload>>,
}

impl RemoteSink for RecordingSink {
    fn notify(&self, payload: &RemotePayload) -> Result<(), SyncWarning> {
        self.payloads.lock().unwrap().push(payload.clone());
        if self.fail {
            Err(SyncWarning::Network("dns error: no such host".into()))
        } else {
            Ok(())
        }
    }
}

impl<T: RemoteSink + ?Sized> RemoteSink for Arc<T> {
    fn notify(&self, payload: &RemotePayload) -> Result<(), SyncWarning> {
        (**self).notify(payload)
    }
}

pub struct StubSummarizer {
    pub summary: Option<AnalysisSummary>,
}

impl Summarizer for StubSummarizer {
    fn summarize(&self, reports: &[Report]) -> Result<AnalysisSummary, AnalysisError> {
        if reports.is_empty() {
            return Err(AnalysisError::NoReports);
        }
        self.summary
            .clone()
            .ok_or_else(|| AnalysisError::Request("connection reset".into()))
    }
}

pub struct TestApp {
    pub state: AppState,
    pub feed: Arc<StaticFeed>,
    pub sink: Arc<RecordingSink>,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.feeds.hierarchy_sheet_id = Some(HIERARCHY_SHEET.to_string());
    config
}

pub fn hierarchy_url() -> String {
    sheet_url(HIERARCHY_SHEET)
}

pub fn test_app(feed: StaticFeed, sink_fails: bool, summary: Option<AnalysisSummary>) -> TestApp {
    let feed = Arc::new(feed);
    let sink = Arc::new(RecordingSink {
        fail: sink_fails,
        ..RecordingSink::default()
    });
    let state = AppState::new(
        test_config(),
        make_db(),
        Box::new(feed.clone()),
        Box::new(sink.clone()),
        Box::new(StubSummarizer { summary }),
    )
    .expect("Failed to build state");

    TestApp { state, feed, sink }
}

pub fn get(uri: &str) -> Request {
    http::Request::builder()
        .method(http::Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, body: &str, htmx: bool) -> Request {
    let mut builder = http::Request::builder()
        .method(http::Method::POST)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded");
    if htmx {
        builder = builder.header("HX-Request", "true");
    }
    builder.body(Body::from(body.as_bytes().to_vec())).unwrap()
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn sample_report(id: &str, village: &str) -> Report {
    Report {
        id: id.to_string(),
        village_name: village.to_string(),
        province: "Al Haouz".to_string(),
        commune: "Asni".to_string(),
        region: Some("Marrakech-Safi".to_string()),
        damage_type: "Houses collapsed".to_string(),
        damage_level: crate::domain::DamageLevel::Critical,
        needs: "Tents, blankets".to_string(),
        contact_number: "+212600000000".to_string(),
        timestamp: "2023-09-09T10:00:00.000Z".to_string(),
        latitude: Some(31.1),
        longitude: Some(-7.9),
        maps_link: Some("https://www.google.com/maps?q=31.1,-7.9".to_string()),
    }
}
