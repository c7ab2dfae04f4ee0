use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use log::{info, warn};
use rand::RngCore;

use crate::db::reports::ReportStore;
use crate::domain::form::{GeolocationFix, ReportForm};
use crate::domain::report::Report;
use crate::errors::ServerError;
use crate::submission::remote::{RemotePayload, RemoteSink, SyncWarning};

/// 16 random bytes, url-safe base64 without padding.
pub fn generate_report_id() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

#[derive(Debug)]
pub struct SubmissionOutcome {
    /// The report as saved locally.
    pub report: Report,
    /// `Err` when only the local save happened.
    pub sync: Result<(), SyncWarning>,
    /// What the form should show next.
    pub next_form: ReportForm,
}

pub struct SubmissionPipeline {
    sink: Box<dyn RemoteSink>,
}

impl SubmissionPipeline {
    pub fn new(sink: Box<dyn RemoteSink>) -> Self {
        Self { sink }
    }

    /// Builds a report from the form and the best-effort position.
    pub fn build_report(form: &ReportForm, geolocation: &GeolocationFix, now: DateTime<Utc>) -> Report {
        let coords = geolocation.ok();
        let maps_link = if form.maps_link.is_empty() {
            coords.map(|c| c.maps_link())
        } else {
            Some(form.maps_link.clone())
        };

        let location = &form.location;
        let mut report = Report {
            id: generate_report_id(),
            village_name: location.village.clone(),
            province: location.province.clone(),
            commune: location.commune.clone(),
            region: Some(location.region.clone()).filter(|r| !r.is_empty()),
            damage_type: form.damage_type.clone(),
            damage_level: form.damage_level,
            needs: form.needs.clone(),
            contact_number: form.contact_number.clone(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            latitude: None,
            longitude: None,
            maps_link,
        };
        report.set_coordinates(coords);
        report
    }

    /// Validate, send to the webhook, then save locally whatever the webhook
    /// did. Only validation and local storage failures are errors; a failed
    /// remote send comes back as `outcome.sync`.
    pub fn submit(
        &self,
        store: &ReportStore,
        form: &ReportForm,
        geolocation: &GeolocationFix,
        now: DateTime<Utc>,
    ) -> Result<SubmissionOutcome, ServerError> {
        form.validate()?;

        let report = Self::build_report(form, geolocation, now);
        if let Err(e) = geolocation {
            info!("report {} submitted without coordinates: {e}", report.id);
        }

        let sync = self.sink.notify(&RemotePayload::from(&report));
        if let Err(e) = &sync {
            warn!("report {} kept locally only: {e}", report.id);
        }

        store.add(report.clone())?;

        let mut submitted = form.clone();
        submitted.maps_link = report.maps_link().unwrap_or_default().to_string();

        Ok(SubmissionOutcome {
            next_form: submitted.after_submit(),
            report,
            sync,
        })
    }
}
