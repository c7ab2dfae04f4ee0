use chrono::Utc;
use log::{debug, warn};
use rusqlite::{params, OptionalExtension};
use std::sync::Mutex;

use crate::db::connection::Database;
use crate::domain::report::Report;
use crate::errors::ServerError;

/// Reads the raw JSON held in a slot, if the slot exists.
pub fn read_slot(db: &Database, key: &str) -> Result<Option<String>, ServerError> {
    db.with_conn(|conn| {
        conn.query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("read slot failed: {e}")))
    })
}

/// Replaces the whole slot.
pub fn write_slot(db: &Database, key: &str, value: &str) -> Result<(), ServerError> {
    let now = Utc::now().to_rfc3339();
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )
        .map_err(|e| ServerError::DbError(format!("write slot failed: {e}")))?;
        Ok(())
    })
}

/// The locally persisted report collection.
///
/// Loaded once, kept in memory, and written back in full after every
/// mutation. Newest reports come first.
pub struct ReportStore {
    db: Database,
    key: String,
    reports: Mutex<Vec<Report>>,
}

impl ReportStore {
    pub fn load(db: Database, key: impl Into<String>) -> Result<Self, ServerError> {
        let key = key.into();
        let reports = match read_slot(&db, &key)? {
            Some(json) => serde_json::from_str::<Vec<Report>>(&json).unwrap_or_else(|e| {
                warn!("slot {key} holds unreadable reports, starting empty: {e}");
                Vec::new()
            }),
            None => Vec::new(),
        };
        debug!("loaded {} local reports from slot {key}", reports.len());

        Ok(Self {
            db,
            key,
            reports: Mutex::new(reports),
        })
    }

    pub fn all(&self) -> Vec<Report> {
        self.reports.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.reports.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Option<Report> {
        self.reports
            .lock()
            .ok()
            .and_then(|r| r.iter().find(|report| report.id == id).cloned())
    }

    /// Prepends a report. Ids are unique within the collection.
    pub fn add(&self, report: Report) -> Result<(), ServerError> {
        let mut reports = self.reports.lock().map_err(|_| ServerError::InternalError)?;
        if reports.iter().any(|r| r.id == report.id) {
            return Err(ServerError::BadRequest(format!(
                "report {} already exists",
                report.id
            )));
        }

        let mut updated = Vec::with_capacity(reports.len() + 1);
        updated.push(report);
        updated.extend(reports.iter().cloned());

        self.persist(&updated)?;
        *reports = updated;
        Ok(())
    }

    /// Removes a report by id. Unknown ids are a no-op.
    pub fn remove(&self, id: &str) -> Result<bool, ServerError> {
        let mut reports = self.reports.lock().map_err(|_| ServerError::InternalError)?;
        if !reports.iter().any(|r| r.id == id) {
            return Ok(false);
        }

        let updated: Vec<Report> = reports.iter().filter(|r| r.id != id).cloned().collect();
        self.persist(&updated)?;
        *reports = updated;
        Ok(true)
    }

    fn persist(&self, reports: &[Report]) -> Result<(), ServerError> {
        let json = serde_json::to_string(reports)
            .map_err(|e| ServerError::DbError(format!("serialize reports failed: {e}")))?;
        write_slot(&self.db, &self.key, &json)?;
        debug!("slot {} rewritten with {} reports", self.key, reports.len());
        Ok(())
    }
}
