//! Media upload and removal routes.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use bazaar_core::media::{DocumentKind, StoredObject, UploadFile};
use bazaar_shared::{AppError, ListingId, OwnerId};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::error_response;
use crate::AppState;

/// Multipart field carrying listing images.
pub const IMAGES_FIELD: &str = "images";

/// Multipart field carrying a profile photo.
pub const PHOTO_FIELD: &str = "photo";

/// Multipart field carrying a listing document.
pub const DOCUMENT_FIELD: &str = "document";

/// Upper bound on an upload request body.
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Creates the media routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/listings/{listing_id}/images",
            get(list_images).post(upload_images),
        )
        .route(
            "/listings/{listing_id}/documents/{kind}",
            post(upload_document),
        )
        .route("/owners/{owner_id}/profile-photo", post(upload_profile_photo))
        .route("/media", delete(delete_by_url))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// Response for an image upload.
#[derive(Debug, Serialize)]
pub struct UploadImagesResponse {
    /// Always true.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Prefix the images were written under.
    pub folder: String,
    /// Public URLs in upload order.
    pub urls: Vec<String>,
}

/// Response listing a listing's images.
#[derive(Debug, Serialize)]
pub struct ListImagesResponse {
    /// Always true.
    pub success: bool,
    /// Public URLs of the stored images.
    pub urls: Vec<String>,
}

/// Response for a single stored object.
#[derive(Debug, Serialize)]
pub struct StoredObjectResponse {
    /// Always true.
    pub success: bool,
    /// Public URL of the object.
    pub url: String,
    /// Bucket the object was written to.
    pub bucket: String,
    /// Object key.
    pub key: String,
}

impl From<StoredObject> for StoredObjectResponse {
    fn from(object: StoredObject) -> Self {
        Self {
            success: true,
            url: object.url,
            bucket: object.bucket,
            key: object.key,
        }
    }
}

/// Body of a delete-by-URL request.
#[derive(Debug, Deserialize)]
pub struct DeleteByUrlRequest {
    /// Public or authenticated object URL.
    pub url: String,
}

/// Response for a delete-by-URL request.
#[derive(Debug, Serialize)]
pub struct DeleteByUrlResponse {
    /// Always true.
    pub success: bool,
    /// Bucket the object was removed from.
    pub bucket: String,
    /// Removed key.
    pub key: String,
}

/// Collect the parts of a multipart body named `name`.
async fn read_files(multipart: &mut Multipart, name: &str) -> Result<Vec<UploadFile>, AppError> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        if field.name() != Some(name) {
            continue;
        }
        let file_name = field.file_name().map(String::from);
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        files.push(UploadFile::new(file_name, content_type, bytes));
    }
    Ok(files)
}

/// The single part named `name`; later duplicates are ignored.
async fn read_single_file(multipart: &mut Multipart, name: &str) -> Result<UploadFile, AppError> {
    read_files(multipart, name)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Validation(format!("missing `{name}` part")))
}

fn parse_document_kind(raw: &str) -> Result<DocumentKind, AppError> {
    match raw {
        "ownership" => Ok(DocumentKind::Ownership),
        "identity" => Ok(DocumentKind::Identity),
        other => Err(AppError::Validation(format!(
            "unknown document kind `{other}`, expected `ownership` or `identity`"
        ))),
    }
}

/// POST `/listings/{listing_id}/images`
/// Process and store listing images.
async fn upload_images(
    State(state): State<AppState>,
    Path(listing_id): Path<ListingId>,
    mut multipart: Multipart,
) -> Response {
    let files = match read_files(&mut multipart, IMAGES_FIELD).await {
        Ok(files) => files,
        Err(e) => return error_response(&e),
    };

    match state
        .media_service()
        .upload_listing_images(listing_id, files)
        .await
    {
        Ok(upload) => {
            info!(
                listing_id = %listing_id,
                count = upload.images.len(),
                "Listing images uploaded"
            );
            (
                StatusCode::CREATED,
                Json(UploadImagesResponse {
                    success: true,
                    message: format!("{} image(s) uploaded", upload.images.len()),
                    urls: upload.urls(),
                    folder: upload.folder,
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!(listing_id = %listing_id, error = %e, "Failed to upload listing images");
            error_response(&AppError::from(e))
        }
    }
}

/// GET `/listings/{listing_id}/images`
/// List the public URLs of a listing's images.
async fn list_images(
    State(state): State<AppState>,
    Path(listing_id): Path<ListingId>,
) -> Response {
    let urls = state.media_service().list_listing_images(listing_id).await;
    Json(ListImagesResponse { success: true, urls }).into_response()
}

/// POST `/owners/{owner_id}/profile-photo`
/// Store an owner's profile photo.
async fn upload_profile_photo(
    State(state): State<AppState>,
    Path(owner_id): Path<OwnerId>,
    mut multipart: Multipart,
) -> Response {
    let file = match read_single_file(&mut multipart, PHOTO_FIELD).await {
        Ok(file) => file,
        Err(e) => return error_response(&e),
    };

    match state.media_service().upload_profile_photo(owner_id, file).await {
        Ok(object) => {
            info!(owner_id = %owner_id, key = %object.key, "Profile photo uploaded");
            (StatusCode::CREATED, Json(StoredObjectResponse::from(object))).into_response()
        }
        Err(e) => {
            error!(owner_id = %owner_id, error = %e, "Failed to upload profile photo");
            error_response(&AppError::from(e))
        }
    }
}

/// POST `/listings/{listing_id}/documents/{kind}`
/// Store an ownership or identity document for a listing.
async fn upload_document(
    State(state): State<AppState>,
    Path((listing_id, kind)): Path<(ListingId, String)>,
    mut multipart: Multipart,
) -> Response {
    let kind = match parse_document_kind(&kind) {
        Ok(kind) => kind,
        Err(e) => return error_response(&e),
    };
    let file = match read_single_file(&mut multipart, DOCUMENT_FIELD).await {
        Ok(file) => file,
        Err(e) => return error_response(&e),
    };

    match state
        .media_service()
        .upload_document(listing_id, kind, file)
        .await
    {
        Ok(object) => {
            info!(listing_id = %listing_id, kind = %kind, "Listing document uploaded");
            (StatusCode::CREATED, Json(StoredObjectResponse::from(object))).into_response()
        }
        Err(e) => {
            error!(
                listing_id = %listing_id,
                kind = %kind,
                error = %e,
                "Failed to upload listing document"
            );
            error_response(&AppError::from(e))
        }
    }
}

/// DELETE `/media`
/// Remove the object a storage URL points at.
async fn delete_by_url(
    State(state): State<AppState>,
    Json(request): Json<DeleteByUrlRequest>,
) -> Response {
    match state.media_service().delete_by_url(&request.url).await {
        Ok(object) => Json(DeleteByUrlResponse {
            success: true,
            bucket: object.bucket,
            key: object.key,
        })
        .into_response(),
        Err(e) => {
            error!(url = %request.url, error = %e, "Failed to delete object by url");
            error_response(&AppError::from(e))
        }
    }
}
