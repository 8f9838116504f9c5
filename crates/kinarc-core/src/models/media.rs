use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UploaderInfo;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

/// Media lifecycle status.
///
/// `pending` is the only reachable status in this service: a record is
/// written once the object bytes are confirmed present and never promoted
/// afterwards. The enum exists so an out-of-band optimizer can extend the
/// lifecycle without changing callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaStatus {
    Pending,
}

impl MediaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaStatus::Pending => "pending",
        }
    }
}

impl std::fmt::Display for MediaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for MediaStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(MediaStatus::Pending),
            other => Err(format!("unknown media status: {}", other)),
        }
    }
}

/// Metadata row describing an uploaded object, as distinct from the object
/// bytes themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    pub id: Uuid,
    pub uploader_id: Uuid,
    pub original_filename: String,
    pub storage_key: String,
    pub mime_type: String,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub status: MediaStatus,
    pub created_at: DateTime<Utc>,
}

/// Derived rendition (e.g. thumbnail) of an original media object, tracked
/// separately. Nothing in this service creates them synchronously; an
/// out-of-band optimizer may.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
#[serde(rename_all = "camelCase")]
pub struct OptimizedVariant {
    pub id: Uuid,
    pub media_id: Uuid,
    pub storage_key: String,
    pub created_at: DateTime<Utc>,
}

/// Media record plus its uploader, as returned by the upload endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaRecordResponse {
    #[serde(flatten)]
    pub record: MediaRecord,
    pub uploader: UploaderInfo,
}

/// One entry of the paginated media listing. URLs point at the latest
/// optimized variant when one exists, else the original object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaListItem {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub mime_type: String,
    pub original_filename: String,
    pub url: String,
    pub thumbnail_url: String,
    pub uploader: UploaderInfo,
    pub status: MediaStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaListResponse {
    pub items: Vec<MediaListItem>,
    pub next_offset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        assert_eq!(
            MediaStatus::try_from("pending".to_string()),
            Ok(MediaStatus::Pending)
        );
        assert_eq!(MediaStatus::Pending.as_str(), "pending");
        assert!(MediaStatus::try_from("ready".to_string()).is_err());
    }

    #[test]
    fn record_serializes_camel_case() {
        let record = MediaRecord {
            id: Uuid::nil(),
            uploader_id: Uuid::nil(),
            original_filename: "cat.jpg".to_string(),
            storage_key: "originals/x/cat.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            status: MediaStatus::Pending,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&record).expect("serialize");
        assert!(json.get("originalFilename").is_some());
        assert!(json.get("storageKey").is_some());
        assert_eq!(json.get("status").and_then(|v| v.as_str()), Some("pending"));
    }
}
