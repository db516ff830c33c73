//! Listing and account deletion routes.
//!
//! Both routes archive evidence first. When archival is incomplete nothing is
//! deleted and the client receives 503 with the archive report, so the same
//! request can simply be repeated.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::USER_AGENT},
    response::{IntoResponse, Response},
    routing::delete,
};
use bazaar_core::archive::ArchiveResult;
use bazaar_core::deletion::{DeletionContext, DeletionOutcome};
use bazaar_shared::{AppError, ListingId, OwnerId};
use serde::Serialize;
use tracing::{error, info};

use super::error_response;
use crate::AppState;

/// Creates the deletion routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/owners/{owner_id}/listings/{listing_id}",
            delete(delete_listing),
        )
        .route("/owners/{owner_id}", delete(delete_account))
}

/// Response for a deletion request.
#[derive(Debug, Serialize)]
pub struct DeletionResponse {
    /// Whether the data was deleted.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Archive run report.
    pub archival: ArchiveResult,
}

/// Client address and user agent as seen through the proxy headers.
pub fn context_from_headers(headers: &HeaderMap) -> DeletionContext {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    let actor_ip = header("x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| header("x-real-ip"))
        .map(String::from);

    DeletionContext {
        actor_ip,
        user_agent: header(USER_AGENT.as_str()).map(String::from),
    }
}

fn outcome_response(outcome: DeletionOutcome, deleted_message: &str) -> Response {
    let archival = outcome.result.clone();
    match outcome.into_app_result() {
        Ok(_) => (
            StatusCode::OK,
            Json(DeletionResponse {
                success: true,
                message: deleted_message.to_string(),
                archival,
            }),
        )
            .into_response(),
        Err(e) => {
            let status = if e.is_retryable() {
                StatusCode::SERVICE_UNAVAILABLE
            } else {
                StatusCode::from_u16(e.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            };
            let message = match e {
                AppError::TemporarilyUnavailable(msg) => msg,
                other => other.to_string(),
            };
            (
                status,
                Json(DeletionResponse {
                    success: false,
                    message,
                    archival,
                }),
            )
                .into_response()
        }
    }
}

/// DELETE `/owners/{owner_id}/listings/{listing_id}`
/// Archive a listing's evidence, then delete it.
async fn delete_listing(
    State(state): State<AppState>,
    Path((owner_id, listing_id)): Path<(OwnerId, ListingId)>,
    headers: HeaderMap,
) -> Response {
    let context = context_from_headers(&headers);
    match state
        .deletion_service()
        .delete_listing(owner_id, listing_id, context)
        .await
    {
        Ok(outcome) => {
            info!(
                owner_id = %owner_id,
                listing_id = %listing_id,
                success = outcome.is_success(),
                "Listing deletion finished"
            );
            outcome_response(outcome, "Listing deleted")
        }
        Err(e) => {
            error!(
                owner_id = %owner_id,
                listing_id = %listing_id,
                error = %e,
                "Listing deletion failed"
            );
            error_response(&AppError::from(e))
        }
    }
}

/// DELETE `/owners/{owner_id}`
/// Archive every piece of an account's evidence, then delete the account.
async fn delete_account(
    State(state): State<AppState>,
    Path(owner_id): Path<OwnerId>,
    headers: HeaderMap,
) -> Response {
    let context = context_from_headers(&headers);
    match state.deletion_service().delete_account(owner_id, context).await {
        Ok(outcome) => {
            info!(
                owner_id = %owner_id,
                listings = outcome.listings.len(),
                success = outcome.is_success(),
                "Account deletion finished"
            );
            outcome_response(outcome, "Account deleted")
        }
        Err(e) => {
            error!(owner_id = %owner_id, error = %e, "Account deletion failed");
            error_response(&AppError::from(e))
        }
    }
}
