use astra::Response;
// errors.rs
use thiserror::Error;

use crate::domain::form::ValidationError;

/// Errors originating from either the server logic
/// (routing, missing resources, bad input) or downstream layers (DB, XLSX).
///
/// Feed, sync and analysis failures are not represented here: those are
/// rendered inline as non-fatal notices and never abort a request.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("Database Error: {0}")]
    DbError(String),
    #[error("Spreadsheet Error: {0}")]
    XlsxError(String),
    #[error("Configuration Error: {0}")]
    Config(String),
    #[error("Internal Server Error")]
    InternalError,
}

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::BadRequest(_) => 400,
            ServerError::Validation(_) => 422,
            ServerError::DbError(_)
            | ServerError::XlsxError(_)
            | ServerError::Config(_)
            | ServerError::InternalError => 500,
        }
    }
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;
