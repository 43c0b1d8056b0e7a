//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the MediQueue API.
//! It maps domain-specific errors to appropriate HTTP status codes and JSON
//! error responses.
//!
//! Every error body has the shape `{"error": "...", "retryable": bool}`.
//! `retryable` is only true for slot conflicts, where the client should
//! regenerate its candidate slots and let the patient pick again.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mediqueue_core::errors::MediError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use mediqueue_api::middleware::error_handling::AppError;
/// use mediqueue_core::errors::MediError;
/// use uuid::Uuid;
///
/// async fn handler(id: Uuid) -> Result<Json<Uuid>, AppError> {
///     Err(AppError(MediError::NotFound(format!("Appointment with ID {} not found", id))))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub MediError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            MediError::NotFound(_) => StatusCode::NOT_FOUND,
            MediError::Validation(_) => StatusCode::BAD_REQUEST,
            MediError::Conflict(_) => StatusCode::CONFLICT,
            MediError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            MediError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self.0);
        }

        let body = Json(json!({
            "error": self.0.to_string(),
            "retryable": self.0.is_retryable(),
        }));

        (status, body).into_response()
    }
}

/// Automatic conversion from MediError to AppError
impl From<MediError> for AppError {
    fn from(err: MediError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError
///
/// Repository functions return `eyre::Result`, so their failures surface as
/// `MediError::Database`.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(MediError::Database(err))
    }
}

/// Maps a MediError to an HTTP response
pub fn map_error(err: MediError) -> Response {
    AppError(err).into_response()
}
