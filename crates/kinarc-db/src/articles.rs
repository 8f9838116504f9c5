//! Article repository.

use chrono::{DateTime, Utc};
use kinarc_core::models::{Article, ArticleResponse, UploaderInfo};
use kinarc_core::AppError;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct ArticleWithAuthorRow {
    id: Uuid,
    slug: String,
    title: String,
    description: Option<String>,
    content: String,
    hero_image_url: Option<String>,
    tags: Vec<String>,
    pub_date: DateTime<Utc>,
    author_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_name: Option<String>,
    author_email: Option<String>,
    author_image: Option<String>,
}

impl From<ArticleWithAuthorRow> for ArticleResponse {
    fn from(row: ArticleWithAuthorRow) -> Self {
        let author = UploaderInfo {
            id: row.author_id,
            name: row.author_name,
            email: row.author_email,
            image: row.author_image,
        };
        ArticleResponse {
            article: Article {
                id: row.id,
                slug: row.slug,
                title: row.title,
                description: row.description,
                content: row.content,
                hero_image_url: row.hero_image_url,
                tags: row.tags,
                pub_date: row.pub_date,
                author_id: row.author_id,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            author,
        }
    }
}

const JOINED_SELECT: &str = r#"
    SELECT
        a.id, a.slug, a.title, a.description, a.content, a.hero_image_url,
        a.tags, a.pub_date, a.author_id, a.created_at, a.updated_at,
        u.name AS author_name, u.email AS author_email, u.image AS author_image
    FROM articles a
    JOIN users u ON u.id = a.author_id
"#;

#[derive(Clone)]
pub struct ArticleRepository {
    pool: PgPool,
}

impl ArticleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All articles, newest first, author embedded.
    pub async fn list(&self) -> Result<Vec<ArticleResponse>, AppError> {
        let rows = sqlx::query_as::<_, ArticleWithAuthorRow>(&format!(
            "{} ORDER BY a.created_at DESC",
            JOINED_SELECT
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<ArticleResponse>, AppError> {
        let row = sqlx::query_as::<_, ArticleWithAuthorRow>(&format!(
            "{} WHERE a.slug = $1",
            JOINED_SELECT
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        author_id: Uuid,
        slug: &str,
        title: &str,
        description: Option<&str>,
        content: &str,
        hero_image_url: Option<&str>,
        tags: &[String],
    ) -> Result<Article, AppError> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            INSERT INTO articles (slug, title, description, content, hero_image_url, tags, pub_date, author_id)
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), $7)
            RETURNING id, slug, title, description, content, hero_image_url, tags,
                      pub_date, author_id, created_at, updated_at
            "#,
        )
        .bind(slug)
        .bind(title)
        .bind(description)
        .bind(content)
        .bind(hero_image_url)
        .bind(tags)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(format!("article slug already exists: {}", slug))
            }
            _ => AppError::Database(e),
        })?;
        Ok(article)
    }
}
