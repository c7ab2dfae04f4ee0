// src/domain/severity.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::feeds::cell_text;

/// Four-point urgency scale. Variant order is the severity order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DamageLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl Default for DamageLevel {
    fn default() -> Self {
        DamageLevel::Medium
    }
}

impl DamageLevel {
    pub const ALL: [DamageLevel; 4] = [
        DamageLevel::Low,
        DamageLevel::Medium,
        DamageLevel::High,
        DamageLevel::Critical,
    ];

    /// Maps a loosely encoded severity onto the scale.
    ///
    /// The checks are substring tests applied in a fixed order, not a
    /// numeric comparison: `"14"` and `"41"` both resolve to `Low` because
    /// the `'1'` test runs first. Anything without `1`, `3` or `4`
    /// (including `"2"` and the empty string) is `Medium`.
    pub fn from_raw(raw: &str) -> DamageLevel {
        if raw.contains('1') {
            return DamageLevel::Low;
        }
        if raw.contains('3') {
            return DamageLevel::High;
        }
        if raw.contains('4') {
            return DamageLevel::Critical;
        }
        DamageLevel::Medium
    }

    /// Enum token as used in forms and in the stored JSON.
    pub fn token(&self) -> &'static str {
        match self {
            DamageLevel::Low => "LOW",
            DamageLevel::Medium => "MEDIUM",
            DamageLevel::High => "HIGH",
            DamageLevel::Critical => "CRITICAL",
        }
    }

    pub fn from_token(token: &str) -> Option<DamageLevel> {
        DamageLevel::ALL
            .into_iter()
            .find(|level| level.token().eq_ignore_ascii_case(token.trim()))
    }

    /// Numeric-string encoding sent to the submission webhook.
    pub fn numeric(&self) -> &'static str {
        match self {
            DamageLevel::Low => "1",
            DamageLevel::Medium => "2",
            DamageLevel::High => "3",
            DamageLevel::Critical => "4",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DamageLevel::Low => "منخفض",
            DamageLevel::Medium => "متوسط",
            DamageLevel::High => "مرتفع",
            DamageLevel::Critical => "حرج جداً",
        }
    }

    /// e.g. "3 - مرتفع"
    pub fn numbered_label(&self) -> String {
        format!("{} - {}", self.numeric(), self.label())
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            DamageLevel::Low => "level-low",
            DamageLevel::Medium => "level-medium",
            DamageLevel::High => "level-high",
            DamageLevel::Critical => "level-critical",
        }
    }
}

/// Severity of an untyped feed cell. An absent cell coerces to the string
/// "undefined", which carries none of the trigger digits.
pub fn map_severity(raw: Option<&Value>) -> DamageLevel {
    match raw {
        Some(value) => DamageLevel::from_raw(&cell_text(value).unwrap_or_default()),
        None => DamageLevel::Medium,
    }
}
