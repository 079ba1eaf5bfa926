//! Error types for the marketplace server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid pagination input: {0}")]
    InvalidPaginationInput(String),

    #[error("Invalid sort field '{field}', expected one of: {allowed}")]
    InvalidSortField { field: String, allowed: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Business not found: {0}")]
    BusinessNotFound(i64),

    #[error("Invalid market listing section: {0}")]
    InvalidMarketListingSection(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl Error {
    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidPaginationInput(_)
            | Error::InvalidSortField { .. }
            | Error::Validation(_)
            | Error::InvalidMarketListingSection(_) => StatusCode::BAD_REQUEST,
            Error::BusinessNotFound(_) | Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Database(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "Internal error");
            "Internal server error".to_string()
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
            self.to_string()
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": message,
        }));

        (status, body).into_response()
    }
}
