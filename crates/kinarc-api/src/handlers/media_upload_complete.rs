use crate::auth::SessionContext;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use kinarc_core::models::MediaRecordResponse;
use kinarc_core::AppError;
use kinarc_db::{CreateOutcome, NewMedia};
use serde::Deserialize;
use std::sync::Arc;

const DEFAULT_FILENAME: &str = "upload";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadCompleteRequest {
    #[serde(default)]
    pub storage_key: Option<String>,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
}

/// Path A step 5: the client confirms the presigned PUT finished; record
/// the metadata. Idempotent on `storageKey`: a retry or a lost race
/// returns the existing record with 200 instead of erroring.
#[tracing::instrument(
    skip(state, request),
    fields(user_id = %session.user_id, operation = "upload_complete")
)]
pub async fn upload_complete(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
    Json(request): Json<UploadCompleteRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let storage_key = request
        .storage_key
        .filter(|k| !k.is_empty())
        .ok_or_else(|| AppError::InvalidInput("storageKey required".to_string()))?;
    let original_filename = request
        .original_filename
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string());
    let mime_type = request
        .file_type
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

    let uploader = state.users.resolve_or_create(&session.identity()).await?;

    let outcome = state
        .media
        .repository
        .create(NewMedia {
            uploader_id: uploader.id,
            original_filename,
            storage_key: storage_key.clone(),
            mime_type,
        })
        .await?;

    match outcome {
        CreateOutcome::Created(record) => {
            tracing::info!(
                media_id = %record.id,
                storage_key = %storage_key,
                "Upload completion recorded"
            );
            Ok((
                StatusCode::CREATED,
                Json(MediaRecordResponse {
                    record,
                    uploader: uploader.public_info(),
                }),
            ))
        }
        CreateOutcome::AlreadyExists(record) => {
            // The existing record may belong to a different caller; return
            // its uploader, not ours.
            let (record, existing_uploader) = state
                .media
                .repository
                .get_with_uploader(record.id)
                .await?
                .ok_or_else(|| {
                    AppError::Internal("existing media record vanished".to_string())
                })?;
            tracing::info!(
                media_id = %record.id,
                storage_key = %storage_key,
                "Upload completion resolved to existing record"
            );
            Ok((
                StatusCode::OK,
                Json(MediaRecordResponse {
                    record,
                    uploader: existing_uploader,
                }),
            ))
        }
    }
}
