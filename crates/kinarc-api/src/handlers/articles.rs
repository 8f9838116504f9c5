use crate::auth::SessionContext;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use kinarc_core::models::article::slugify;
use kinarc_core::models::{ArticleResponse, NewArticle};
use kinarc_core::AppError;
use std::sync::Arc;

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let articles = state.articles.list().await?;
    Ok(Json(articles))
}

pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let article = state
        .articles
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Article not found".to_string()))?;
    Ok(Json(article))
}

/// Create an article. The slug is derived from the title; the author row
/// is resolved or created from the session claims.
#[tracing::instrument(
    skip(state, article),
    fields(user_id = %session.user_id, operation = "create_article")
)]
pub async fn create_article(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
    Json(article): Json<NewArticle>,
) -> Result<impl IntoResponse, HttpAppError> {
    if article.title.trim().is_empty() {
        return Err(AppError::InvalidInput("title required".to_string()).into());
    }
    if article.content.is_empty() {
        return Err(AppError::InvalidInput("content required".to_string()).into());
    }

    let slug = slugify(&article.title);
    if slug.is_empty() {
        return Err(AppError::InvalidInput(
            "title must contain at least one slug-safe character".to_string(),
        )
        .into());
    }

    let author = state.users.resolve_or_create(&session.identity()).await?;

    let created = state
        .articles
        .create(
            author.id,
            &slug,
            article.title.trim(),
            article.description.as_deref(),
            &article.content,
            article.hero_image_url.as_deref(),
            &article.tags,
        )
        .await?;

    tracing::info!(article_id = %created.id, slug = %created.slug, "Article created");

    Ok((
        StatusCode::CREATED,
        Json(ArticleResponse {
            article: created,
            author: author.public_info(),
        }),
    ))
}
