//! Media record repository.
//!
//! The `storage_key` column carries a unique constraint; concurrent
//! completion calls for the same key serialize at the database and the
//! loser reads the winner's row. That outcome is surfaced as an explicit
//! [`CreateOutcome`] variant instead of an error.

use chrono::{DateTime, Utc};
use kinarc_core::models::{MediaRecord, MediaStatus, OptimizedVariant, UploaderInfo};
use kinarc_core::AppError;
use sqlx::PgPool;
use uuid::Uuid;

/// Fields needed to create a media record. Status is always `pending`.
#[derive(Debug, Clone)]
pub struct NewMedia {
    pub uploader_id: Uuid,
    pub original_filename: String,
    pub storage_key: String,
    pub mime_type: String,
}

/// Result of a create: either a fresh row, or the row another call already
/// created for the same storage key (retry or race).
#[derive(Debug, Clone)]
pub enum CreateOutcome {
    Created(MediaRecord),
    AlreadyExists(MediaRecord),
}

impl CreateOutcome {
    pub fn record(&self) -> &MediaRecord {
        match self {
            CreateOutcome::Created(r) | CreateOutcome::AlreadyExists(r) => r,
        }
    }
}

/// One listing entry: record, uploader, and the latest optimized variant's
/// storage key when one exists.
#[derive(Debug, Clone)]
pub struct MediaListRow {
    pub record: MediaRecord,
    pub uploader: UploaderInfo,
    pub optimized_key: Option<String>,
}

#[derive(sqlx::FromRow)]
struct JoinedRow {
    id: Uuid,
    uploader_id: Uuid,
    original_filename: String,
    storage_key: String,
    mime_type: String,
    status: String,
    created_at: DateTime<Utc>,
    uploader_name: Option<String>,
    uploader_email: Option<String>,
    uploader_image: Option<String>,
    optimized_key: Option<String>,
}

impl JoinedRow {
    fn into_parts(self) -> Result<(MediaRecord, UploaderInfo, Option<String>), AppError> {
        let status = MediaStatus::try_from(self.status).map_err(AppError::Internal)?;
        let record = MediaRecord {
            id: self.id,
            uploader_id: self.uploader_id,
            original_filename: self.original_filename,
            storage_key: self.storage_key,
            mime_type: self.mime_type,
            status,
            created_at: self.created_at,
        };
        let uploader = UploaderInfo {
            id: record.uploader_id,
            name: self.uploader_name,
            email: self.uploader_email,
            image: self.uploader_image,
        };
        Ok((record, uploader, self.optimized_key))
    }
}

const MEDIA_COLUMNS: &str =
    "id, uploader_id, original_filename, storage_key, mime_type, status, created_at";

#[derive(Clone)]
pub struct MediaRepository {
    pool: PgPool,
}

impl MediaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a media record, resolving a `storage_key` conflict to the
    /// existing row. Exactly one concurrent create for a key observes
    /// `Created`; all others observe `AlreadyExists`.
    pub async fn create(&self, new: NewMedia) -> Result<CreateOutcome, AppError> {
        let inserted = sqlx::query_as::<_, MediaRecord>(&format!(
            r#"
            INSERT INTO media (uploader_id, original_filename, storage_key, mime_type, status)
            VALUES ($1, $2, $3, $4, 'pending')
            ON CONFLICT (storage_key) DO NOTHING
            RETURNING {}
            "#,
            MEDIA_COLUMNS
        ))
        .bind(new.uploader_id)
        .bind(&new.original_filename)
        .bind(&new.storage_key)
        .bind(&new.mime_type)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(record) = inserted {
            return Ok(CreateOutcome::Created(record));
        }

        let existing = self
            .get_by_storage_key(&new.storage_key)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "storage key conflict but no existing record: {}",
                    new.storage_key
                ))
            })?;

        tracing::debug!(
            storage_key = %new.storage_key,
            media_id = %existing.id,
            "Media create resolved to existing record"
        );

        Ok(CreateOutcome::AlreadyExists(existing))
    }

    pub async fn get_by_storage_key(&self, storage_key: &str) -> Result<Option<MediaRecord>, AppError> {
        let record = sqlx::query_as::<_, MediaRecord>(&format!(
            "SELECT {} FROM media WHERE storage_key = $1",
            MEDIA_COLUMNS
        ))
        .bind(storage_key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    /// Fetch a record with its uploader eagerly joined.
    pub async fn get_with_uploader(
        &self,
        id: Uuid,
    ) -> Result<Option<(MediaRecord, UploaderInfo)>, AppError> {
        let row = sqlx::query_as::<_, JoinedRow>(
            r#"
            SELECT
                m.id, m.uploader_id, m.original_filename, m.storage_key,
                m.mime_type, m.status, m.created_at,
                u.name AS uploader_name, u.email AS uploader_email,
                u.image AS uploader_image,
                NULL::text AS optimized_key
            FROM media m
            JOIN users u ON u.id = m.uploader_id
            WHERE m.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let (record, uploader, _) = row.into_parts()?;
                Ok(Some((record, uploader)))
            }
            None => Ok(None),
        }
    }

    /// Paginated listing, newest first, with uploader info and the latest
    /// optimized variant's key per record. Callers clamp `limit`/`offset`.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<MediaListRow>, AppError> {
        let rows = sqlx::query_as::<_, JoinedRow>(
            r#"
            SELECT
                m.id, m.uploader_id, m.original_filename, m.storage_key,
                m.mime_type, m.status, m.created_at,
                u.name AS uploader_name, u.email AS uploader_email,
                u.image AS uploader_image,
                opt.storage_key AS optimized_key
            FROM media m
            JOIN users u ON u.id = m.uploader_id
            LEFT JOIN LATERAL (
                SELECT o.storage_key
                FROM optimized_media o
                WHERE o.media_id = m.id
                ORDER BY o.created_at DESC
                LIMIT 1
            ) opt ON TRUE
            ORDER BY m.created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let (record, uploader, optimized_key) = row.into_parts()?;
                Ok(MediaListRow {
                    record,
                    uploader,
                    optimized_key,
                })
            })
            .collect()
    }

    /// Record a derived rendition for an original. Written by the
    /// out-of-band optimizer; the listing query reads it back.
    pub async fn add_optimized_variant(
        &self,
        media_id: Uuid,
        storage_key: &str,
    ) -> Result<OptimizedVariant, AppError> {
        let variant = sqlx::query_as::<_, OptimizedVariant>(
            r#"
            INSERT INTO optimized_media (media_id, storage_key)
            VALUES ($1, $2)
            RETURNING id, media_id, storage_key, created_at
            "#,
        )
        .bind(media_id)
        .bind(storage_key)
        .fetch_one(&self.pool)
        .await?;
        Ok(variant)
    }
}
