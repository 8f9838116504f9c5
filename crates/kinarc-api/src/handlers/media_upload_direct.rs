use crate::auth::SessionContext;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use kinarc_core::models::MediaRecordResponse;
use kinarc_core::AppError;
use kinarc_db::NewMedia;
use kinarc_storage::keys;
use std::sync::Arc;
use uuid::Uuid;

const DEFAULT_FILENAME: &str = "upload";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

struct FilePart {
    filename: String,
    content_type: String,
    data: Vec<u8>,
}

async fn read_file_part(mut multipart: Multipart) -> Result<FilePart, HttpAppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_FILENAME)
            .to_string();
        let content_type = field
            .content_type()
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("failed to read file field: {}", e)))?
            .to_vec();
        return Ok(FilePart {
            filename,
            content_type,
            data,
        });
    }
    Err(AppError::InvalidInput("file field required".to_string()).into())
}

/// Path B: server-side relay for clients that cannot PUT to the store
/// directly (e.g. cross-origin restrictions). Writes the bytes itself and
/// records the metadata in one request; no separate completion step.
#[tracing::instrument(
    skip(state, multipart),
    fields(user_id = %session.user_id, operation = "upload_direct")
)]
pub async fn upload_direct(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let file = read_file_part(multipart).await?;

    let storage_key =
        keys::original_key(session.user_id, Utc::now(), Uuid::new_v4(), &file.filename);

    state
        .media
        .storage
        .put(&storage_key, file.data, &file.content_type)
        .await?;

    let uploader = state.users.resolve_or_create(&session.identity()).await?;

    let outcome = state
        .media
        .repository
        .create(NewMedia {
            uploader_id: uploader.id,
            original_filename: file.filename,
            storage_key: storage_key.clone(),
            mime_type: file.content_type,
        })
        .await?;

    // Keys embed a fresh UUID, so the conflict arm is unreachable in
    // practice; both arms report the record as created.
    let record = outcome.record().clone();

    tracing::info!(
        media_id = %record.id,
        storage_key = %storage_key,
        "Direct upload stored"
    );

    Ok((
        StatusCode::CREATED,
        Json(MediaRecordResponse {
            record,
            uploader: uploader.public_info(),
        }),
    ))
}
