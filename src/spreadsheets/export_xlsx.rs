use crate::domain::report::Report;
use crate::errors::ServerError;
use crate::responses::xlsx_response;
use crate::responses::ResultResp;
use rust_xlsxwriter::{Format, Workbook};

const HEADERS: [&str; 12] = [
    "Timestamp",
    "Region",
    "Village",
    "Province",
    "Commune",
    "Damage type",
    "Urgency",
    "Needs",
    "Phone",
    "Maps link",
    "Latitude",
    "Longitude",
];

/// Reports as an XLSX buffer, one row per report in the given order.
pub fn reports_workbook(reports: &[Report]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    for (i, report) in reports.iter().enumerate() {
        let r = (i + 1) as u32;
        let text_cells = [
            report.timestamp.as_str(),
            report.region.as_deref().unwrap_or(""),
            report.village_name.as_str(),
            report.province.as_str(),
            report.commune.as_str(),
            report.damage_type.as_str(),
            report.damage_level.token(),
            report.needs.as_str(),
            report.contact_number.as_str(),
            report.maps_link().unwrap_or(""),
        ];

        for (col, value) in text_cells.iter().enumerate() {
            worksheet
                .write_string(r, col as u16, *value)
                .map_err(|e| {
                    ServerError::XlsxError(format!("Failed to write {}: {}", HEADERS[col], e))
                })?;
        }

        if let Some(coords) = report.coordinates() {
            worksheet
                .write_number(r, 10, coords.latitude)
                .map_err(|e| ServerError::XlsxError(format!("Failed to write latitude: {}", e)))?;
            worksheet
                .write_number(r, 11, coords.longitude)
                .map_err(|e| ServerError::XlsxError(format!("Failed to write longitude: {}", e)))?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {}", e)))
}

pub fn export_reports_xlsx(reports: &[Report], filename: &str) -> ResultResp {
    let buffer = reports_workbook(reports)?;
    xlsx_response(buffer, filename)
}
