//! Storage key generation.
//!
//! Both upload paths (presigned and relay) build keys here so retries and
//! races collide on the unique `storage_key` constraint instead of
//! producing divergent layouts.

use chrono::{DateTime, Datelike, Utc};
use uuid::Uuid;

const MAX_FILENAME_LEN: usize = 80;

/// Strip a human-supplied filename down to `[A-Za-z0-9_.-]`. Runs of other
/// characters collapse into a single underscore; the result is truncated to
/// 80 characters.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len().min(MAX_FILENAME_LEN));
    let mut last_was_replacement = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
            out.push(c);
            last_was_replacement = false;
        } else if !last_was_replacement {
            out.push('_');
            last_was_replacement = true;
        }
        if out.len() >= MAX_FILENAME_LEN {
            break;
        }
    }
    out.truncate(MAX_FILENAME_LEN);
    out
}

/// Key for an original upload:
/// `originals/{owner_id}/{yyyy}/{mm}/{file_id}_{sanitized_name}`.
pub fn original_key(
    owner_id: Uuid,
    now: DateTime<Utc>,
    file_id: Uuid,
    filename: &str,
) -> String {
    format!(
        "originals/{}/{}/{:02}/{}_{}",
        owner_id,
        now.year(),
        now.month(),
        file_id,
        sanitize_filename(filename)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn sanitize_keeps_safe_characters() {
        assert_eq!(sanitize_filename("photo_2024.final-v2.jpg"), "photo_2024.final-v2.jpg");
    }

    #[test]
    fn sanitize_collapses_runs_of_unsafe_characters() {
        assert_eq!(sanitize_filename("家族 写真 (1).jpg"), "_1_.jpg");
        assert_eq!(sanitize_filename("a  b//c.png"), "a_b_c.png");
    }

    #[test]
    fn sanitize_truncates_to_80() {
        let long = "x".repeat(200);
        assert_eq!(sanitize_filename(&long).len(), 80);
    }

    #[test]
    fn original_key_shape() {
        let owner = Uuid::nil();
        let file_id = Uuid::nil();
        let now = Utc.with_ymd_and_hms(2026, 3, 7, 12, 0, 0).unwrap();
        let key = original_key(owner, now, file_id, "cat pic.jpg");
        assert_eq!(
            key,
            format!("originals/{}/2026/03/{}_cat_pic.jpg", owner, file_id)
        );
    }
}
