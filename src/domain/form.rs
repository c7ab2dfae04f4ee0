// src/domain/form.rs

use std::collections::HashMap;
use thiserror::Error;

use crate::domain::hierarchy::{LocationLevel, LocationSelection};
use crate::domain::report::Coordinates;
use crate::domain::severity::DamageLevel;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("required field missing: {0}")]
    MissingField(&'static str),
}

impl ValidationError {
    /// Message shown next to the form.
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::MissingField(field) => {
                format!("يرجى ملء الخانة الإجبارية: {}", field_label(field))
            }
        }
    }
}

fn field_label(field: &str) -> &'static str {
    match field {
        "village_name" => "اسم الدوار",
        "province" => "الإقليم",
        "commune" => "الجماعة",
        _ => "خانة",
    }
}

/// Why the browser could not supply coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("location permission denied")]
    Denied,
    #[error("location request timed out")]
    Timeout,
    #[error("geolocation unsupported")]
    Unsupported,
    #[error("location unavailable")]
    Unavailable,
}

impl GeolocationError {
    fn from_status(status: &str) -> GeolocationError {
        match status.trim() {
            "denied" => GeolocationError::Denied,
            "timeout" => GeolocationError::Timeout,
            "unsupported" => GeolocationError::Unsupported,
            _ => GeolocationError::Unavailable,
        }
    }
}

/// Best-effort position attached to a submission.
pub type GeolocationFix = Result<Coordinates, GeolocationError>;

/// Reads the hidden inputs the browser hook fills in. Coordinates win
/// whenever both parse, whatever the reported status.
pub fn geolocation_from_params(params: &HashMap<String, String>) -> GeolocationFix {
    let number = |key: &str| params.get(key).and_then(|v| v.trim().parse::<f64>().ok());

    match Coordinates::from_pair(number("latitude"), number("longitude")) {
        Some(coords) => Ok(coords),
        None => Err(GeolocationError::from_status(
            params.get("location_status").map(String::as_str).unwrap_or(""),
        )),
    }
}

/// Field values of the report form as typed by the agent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportForm {
    pub location: LocationSelection,
    pub damage_type: String,
    pub damage_level: DamageLevel,
    pub needs: String,
    pub contact_number: String,
    pub maps_link: String,
}

impl ReportForm {
    pub fn from_params(params: &HashMap<String, String>) -> ReportForm {
        let field = |key: &str| params.get(key).map(|v| v.trim().to_string()).unwrap_or_default();

        ReportForm {
            location: LocationSelection {
                region: field(LocationLevel::Region.field()),
                province: field(LocationLevel::Province.field()),
                commune: field(LocationLevel::Commune.field()),
                village: field(LocationLevel::Village.field()),
            },
            damage_type: field("damage_type"),
            damage_level: DamageLevel::from_token(&field("damage_level")).unwrap_or_default(),
            needs: field("needs"),
            contact_number: field("contact_number"),
            maps_link: field("maps_link"),
        }
    }

    /// Required-field check; the only validation performed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            (LocationLevel::Village, &self.location.village),
            (LocationLevel::Province, &self.location.province),
            (LocationLevel::Commune, &self.location.commune),
        ];
        for (level, value) in required {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(level.field()));
            }
        }
        Ok(())
    }

    /// State of the form after a submission: the agent's answers are cleared
    /// but a maps link stays for the next report from the same spot.
    pub fn after_submit(&self) -> ReportForm {
        ReportForm {
            maps_link: self.maps_link.clone(),
            ..ReportForm::default()
        }
    }
}
