// responses/xlsx.rs
use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Workbook download. The export reflects the feed at request time, so it
/// is never cached.
pub fn xlsx_response(workbook: Vec<u8>, filename: &str) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", XLSX_MIME)
        .header(
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", attachment_name(filename)),
        )
        .header("Cache-Control", "no-store")
        .body(Body::from(workbook))
        .map_err(|_| ServerError::InternalError)
}

/// Keeps a filename safe inside a quoted header value.
pub fn attachment_name(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' | '_' => c,
            _ => '_',
        })
        .collect();

    if cleaned.trim_matches(|c| c == '.' || c == '_').is_empty() {
        "reports.xlsx".to_string()
    } else {
        cleaned
    }
}
