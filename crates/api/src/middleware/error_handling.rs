//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and JSON error bodies. Workflow
//! endpoints return structured results instead; this covers the listing and
//! catalog endpoints.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use classdesk_core::errors::DeskError;
use serde_json::json;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use classdesk_api::middleware::error_handling::AppError;
/// use classdesk_core::errors::DeskError;
///
/// async fn handler(code: String) -> Result<Json<String>, AppError> {
///     if code.is_empty() {
///         return Err(AppError(DeskError::Validation("Course code is required".to_string())));
///     }
///     Ok(Json(code))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub DeskError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DeskError::NotFound(_) => StatusCode::NOT_FOUND,
            DeskError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DeskError::Persistence(err) => {
                error!("store error: {err:?}");
                StatusCode::BAD_GATEWAY
            }
            DeskError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

/// Automatic conversion from DeskError to AppError
impl From<DeskError> for AppError {
    fn from(err: DeskError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError, as a store failure.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(DeskError::Persistence(err))
    }
}
