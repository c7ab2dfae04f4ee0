//! Positional column layout of the spreadsheet feeds.
//!
//! The sheets are read by column index, not by header name. These tables are
//! the single place to edit when a sheet gains, loses or reorders a column.

use crate::domain::hierarchy::HierarchyRow;
use crate::domain::report::{Coordinates, Report};
use crate::domain::severity::map_severity;
use crate::feeds::models::FeedRow;

pub const UNNAMED_VILLAGE: &str = "بدون اسم";
pub const MISSING_TEXT: &str = "-";

/// Column index of each report attribute in the reports sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportColumns {
    pub timestamp: usize,
    pub village_name: usize,
    pub province: usize,
    pub commune: usize,
    pub damage_type: usize,
    pub damage_level: usize,
    pub needs: usize,
    pub contact_number: usize,
    pub maps_link: usize,
    pub latitude: usize,
    pub longitude: usize,
    /// Extended schema only.
    pub region: Option<usize>,
}

impl Default for ReportColumns {
    fn default() -> Self {
        Self {
            timestamp: 0,
            village_name: 1,
            province: 2,
            commune: 3,
            damage_type: 4,
            damage_level: 5,
            needs: 6,
            contact_number: 7,
            maps_link: 8,
            latitude: 9,
            longitude: 10,
            region: Some(11),
        }
    }
}

impl ReportColumns {
    /// Builds a report from one sheet row, defaulting every absent cell.
    pub fn map_row(&self, row: &FeedRow, id: String) -> Report {
        let text_or = |index: usize, default: &str| row.text(index).unwrap_or_else(|| default.to_string());

        let mut report = Report {
            id,
            timestamp: text_or(self.timestamp, ""),
            village_name: text_or(self.village_name, UNNAMED_VILLAGE),
            province: text_or(self.province, MISSING_TEXT),
            commune: text_or(self.commune, MISSING_TEXT),
            region: self.region.and_then(|index| row.text(index)),
            damage_type: text_or(self.damage_type, MISSING_TEXT),
            damage_level: map_severity(row.value(self.damage_level)),
            needs: text_or(self.needs, MISSING_TEXT),
            contact_number: text_or(self.contact_number, MISSING_TEXT),
            maps_link: Some(text_or(self.maps_link, "")),
            latitude: None,
            longitude: None,
        };
        report.set_coordinates(Coordinates::from_pair(
            row.number(self.latitude),
            row.number(self.longitude),
        ));
        report
    }
}

/// Column index of each level in the hierarchy sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyColumns {
    pub region: usize,
    pub province: usize,
    pub commune: usize,
    pub village: usize,
}

impl Default for HierarchyColumns {
    fn default() -> Self {
        Self {
            region: 0,
            province: 1,
            commune: 2,
            village: 3,
        }
    }
}

impl HierarchyColumns {
    pub fn map_row(&self, row: &FeedRow) -> HierarchyRow {
        let text = |index: usize| row.text(index).unwrap_or_default();
        HierarchyRow::new(
            &text(self.region),
            &text(self.province),
            &text(self.commune),
            &text(self.village),
        )
    }
}
