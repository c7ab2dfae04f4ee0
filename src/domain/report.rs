// src/domain/report.rs

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::severity::DamageLevel;

/// A latitude/longitude pair. Reports carry both or neither.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Both values present and finite, otherwise `None`.
    pub fn from_pair(latitude: Option<f64>, longitude: Option<f64>) -> Option<Coordinates> {
        match (latitude, longitude) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Some(Coordinates {
                latitude: lat,
                longitude: lng,
            }),
            _ => None,
        }
    }

    /// Within the WGS84 range, i.e. something a map can place.
    pub fn is_plottable(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    pub fn maps_link(&self) -> String {
        format!(
            "https://www.google.com/maps?q={},{}",
            self.latitude, self.longitude
        )
    }
}

/// A single field account of one damaged douar.
///
/// Reports are never edited after creation; the collection only grows by
/// prepending and shrinks by explicit removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub village_name: String,
    pub province: String,
    pub commune: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub damage_type: String,
    pub damage_level: DamageLevel,
    pub needs: String,
    pub contact_number: String,
    /// ISO-8601 for local reports, whatever the sheet holds for remote rows.
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maps_link: Option<String>,
}

impl Report {
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_pair(self.latitude, self.longitude)
    }

    pub fn set_coordinates(&mut self, coords: Option<Coordinates>) {
        self.latitude = coords.map(|c| c.latitude);
        self.longitude = coords.map(|c| c.longitude);
    }

    /// Maps link, treating an empty string as absent.
    pub fn maps_link(&self) -> Option<&str> {
        self.maps_link.as_deref().filter(|l| !l.is_empty())
    }

    /// Maps link fit for an `href`: only absolute http(s) URLs.
    pub fn web_maps_link(&self) -> Option<&str> {
        self.maps_link().map(str::trim).filter(|link| {
            Url::parse(link)
                .map(|url| matches!(url.scheme(), "http" | "https"))
                .unwrap_or(false)
        })
    }
}
