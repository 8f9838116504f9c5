use crate::auth::SessionContext;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use kinarc_storage::keys;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

const DEFAULT_FILENAME: &str = "upload";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateUploadUrlRequest {
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateUploadUrlResponse {
    pub url: String,
    pub storage_key: String,
}

/// Path A step 1-3: hand the client a presigned PUT URL and the storage
/// key it must echo back on completion. No bytes or rows are written here.
#[tracing::instrument(
    skip(state, request),
    fields(user_id = %session.user_id, operation = "generate_upload_url")
)]
pub async fn generate_upload_url(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
    Json(request): Json<GenerateUploadUrlRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let file_name = request
        .file_name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string());
    let file_type = request
        .file_type
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

    let storage_key = keys::original_key(session.user_id, Utc::now(), Uuid::new_v4(), &file_name);

    let url = state
        .media
        .storage
        .presigned_put_url(&storage_key, &file_type, state.media.presign_expiry)
        .await?;

    tracing::info!(
        storage_key = %storage_key,
        file_type = %file_type,
        "Generated presigned upload URL"
    );

    Ok(Json(GenerateUploadUrlResponse { url, storage_key }))
}
