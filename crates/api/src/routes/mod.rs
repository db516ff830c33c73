//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bazaar_shared::AppError;
use serde_json::json;

use crate::AppState;

pub mod deletion;
pub mod health;
pub mod media;

#[cfg(test)]
mod test_support;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(media::routes())
        .merge(deletion::routes())
}

/// Render an application error as `{ success, error, message }`.
pub(crate) fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = match err {
        AppError::NotFound(what) => format!("{what} not found"),
        AppError::Validation(msg) | AppError::TemporarilyUnavailable(msg) => msg.clone(),
        AppError::Database(_) | AppError::ExternalService(_) | AppError::Internal(_) => {
            "An error occurred".to_string()
        }
    };

    (
        status,
        Json(json!({
            "success": false,
            "error": err.error_code(),
            "message": message,
        })),
    )
        .into_response()
}
