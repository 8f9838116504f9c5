use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UploaderInfo;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

/// A blog-like post in the family archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub hero_image_url: Option<String>,
    pub tags: Vec<String>,
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Article plus its author, as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleResponse {
    #[serde(flatten)]
    pub article: Article,
    pub author: UploaderInfo,
}

/// Fields accepted when creating an article. The slug is derived from the
/// title server-side.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub hero_image_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Derive a URL slug from a title: lowercase, strip everything outside
/// `[a-z0-9 -]`, collapse whitespace runs into single hyphens.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ' || *c == '-')
        .collect();
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Summer Trip 2024"), "summer-trip-2024");
    }

    #[test]
    fn slugify_strips_punctuation_and_collapses_spaces() {
        assert_eq!(slugify("Grandma's   90th birthday!"), "grandmas-90th-birthday");
    }

    #[test]
    fn slugify_non_ascii_drops() {
        // Non-latin titles lose their characters; callers should expect a
        // possibly empty slug and reject the article.
        assert_eq!(slugify("家族写真"), "");
    }
}
