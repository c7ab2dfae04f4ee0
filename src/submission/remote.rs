use log::debug;
use reqwest::blocking::Client;
use serde::{Serialize, Serializer};
use std::time::Duration;
use thiserror::Error;

use crate::domain::report::Report;

/// The remote copy could not be sent. The local save is unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncWarning {
    #[error("remote sync failed: {0}")]
    Network(String),
}

impl SyncWarning {
    pub fn user_message(&self) -> &'static str {
        "تم الحفظ محلياً ولكن تعذر الإرسال للقاعدة الخارجية."
    }
}

/// Report as the submission webhook names its fields.
///
/// `niveau_urgence` carries the numeric encoding ("1".."4"); `region` is
/// only sent when known; missing coordinates are sent as empty strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemotePayload {
    pub nom_douar: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub province: String,
    pub commune: String,
    pub nature_dommages: String,
    pub niveau_urgence: String,
    pub besoins_essentiels: String,
    pub numero_telephone: String,
    pub lien_maps: String,
    #[serde(serialize_with = "number_or_blank")]
    pub latitude: Option<f64>,
    #[serde(serialize_with = "number_or_blank")]
    pub longitude: Option<f64>,
}

fn number_or_blank<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(v) => serializer.serialize_f64(*v),
        None => serializer.serialize_str(""),
    }
}

impl From<&Report> for RemotePayload {
    fn from(report: &Report) -> Self {
        Self {
            nom_douar: report.village_name.clone(),
            region: report.region.clone().filter(|r| !r.is_empty()),
            province: report.province.clone(),
            commune: report.commune.clone(),
            nature_dommages: report.damage_type.clone(),
            niveau_urgence: report.damage_level.numeric().to_string(),
            besoins_essentiels: report.needs.clone(),
            numero_telephone: report.contact_number.clone(),
            lien_maps: report.maps_link().unwrap_or_default().to_string(),
            latitude: report.latitude,
            longitude: report.longitude,
        }
    }
}

/// One-way delivery of a submitted report.
pub trait RemoteSink: Send + Sync {
    fn notify(&self, payload: &RemotePayload) -> Result<(), SyncWarning>;
}

/// POSTs to the spreadsheet webhook. The endpoint's response is opaque, so
/// only a transport failure counts as an error; the status is just logged.
pub struct WebhookSink {
    client: Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SyncWarning> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncWarning::Network(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl RemoteSink for WebhookSink {
    fn notify(&self, payload: &RemotePayload) -> Result<(), SyncWarning> {
        let resp = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .map_err(|e| SyncWarning::Network(e.to_string()))?;

        debug!("webhook answered {} for {}", resp.status(), payload.nom_douar);
        Ok(())
    }
}
