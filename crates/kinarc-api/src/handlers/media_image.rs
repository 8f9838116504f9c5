use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use kinarc_core::AppError;
use kinarc_storage::keys::sanitize_filename;
use std::sync::Arc;
use uuid::Uuid;

const CACHE_CONTROL_VALUE: &str = "public, max-age=31536000";

/// Serve the stored bytes for a media record.
///
/// Both a missing record and a record whose object has gone missing from
/// the store report not-found; the latter is a data inconsistency, not a
/// server fault. The stream is drained fully before responding.
#[tracing::instrument(skip(state), fields(media_id = %id, operation = "serve_media"))]
pub async fn serve_media(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, HttpAppError> {
    let (record, _uploader) = state
        .media
        .repository
        .get_with_uploader(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Media not found".to_string()))?;

    let body = state.media.storage.get(&record.storage_key).await?;
    let buffer = body.into_bytes().await?;

    tracing::debug!(
        media_id = %id,
        storage_key = %record.storage_key,
        size_bytes = buffer.len(),
        "Serving media object"
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, record.mime_type)
        .header(header::CONTENT_LENGTH, buffer.len())
        .header(header::CACHE_CONTROL, CACHE_CONTROL_VALUE)
        .header(
            header::CONTENT_DISPOSITION,
            format!(
                "inline; filename=\"{}\"",
                sanitize_filename(&record.original_filename)
            ),
        )
        .body(Body::from(buffer))
        .map_err(|e| AppError::Internal(format!("failed to build response: {}", e)).into())
}
