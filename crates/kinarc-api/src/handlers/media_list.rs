use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use kinarc_core::models::{MediaListItem, MediaListResponse};
use serde::Deserialize;
use std::sync::Arc;

const DEFAULT_LIMIT: i64 = 24;
const MAX_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Paginated media listing, newest first. URLs prefer the latest optimized
/// variant's storage key over the original's.
#[tracing::instrument(skip(state, pagination), fields(operation = "list_media"))]
pub async fn list_media(
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let limit = clamp_limit(pagination.limit);
    let offset = clamp_offset(pagination.offset);

    let rows = state.media.repository.list(limit, offset).await?;

    let items: Vec<MediaListItem> = rows
        .into_iter()
        .map(|row| {
            let key = row
                .optimized_key
                .as_deref()
                .unwrap_or(&row.record.storage_key);
            let url = state.media.storage.public_url(key);
            MediaListItem {
                id: row.record.id,
                created_at: row.record.created_at,
                mime_type: row.record.mime_type,
                original_filename: row.record.original_filename,
                thumbnail_url: url.clone(),
                url,
                uploader: row.uploader,
                status: row.record.status,
            }
        })
        .collect();

    let next_offset = offset + items.len() as i64;

    Ok(Json(MediaListResponse { items, next_offset }))
}
