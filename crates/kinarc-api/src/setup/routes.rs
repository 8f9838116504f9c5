//! Route configuration and setup

use crate::auth::middleware::{session_middleware, AuthState};
use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use kinarc_core::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let auth_state = Arc::new(AuthState {
        session_jwt_secret: config.session_jwt_secret.clone(),
    });

    let public_routes = public_routes(state.clone());

    // State is applied inside protected_routes() so handlers taking
    // Multipart keep working under the middleware layer.
    let protected_routes = protected_routes(state.clone()).layer(
        axum::middleware::from_fn_with_state(auth_state, session_middleware),
    );

    let app = public_routes
        .merge(protected_routes)
        .layer(RequestBodyLimitLayer::new(config.max_upload_size_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.contains(&"*".to_string()) {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}

/// Public routes (no session required)
fn public_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/media", get(handlers::media_list::list_media))
        .route(
            "/api/media/{id}/image",
            get(handlers::media_image::serve_media),
        )
        .route("/api/articles", get(handlers::articles::list_articles))
        .route(
            "/api/articles/{slug}",
            get(handlers::articles::get_article),
        )
        .with_state(state)
}

/// Protected routes (require a verified session)
fn protected_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .route(
            "/api/media/generate-upload-url",
            post(handlers::media_upload_url::generate_upload_url),
        )
        .route(
            "/api/media/upload-complete",
            post(handlers::media_upload_complete::upload_complete),
        )
        .route(
            "/api/media/upload-direct",
            post(handlers::media_upload_direct::upload_direct),
        )
        .route("/api/articles", post(handlers::articles::create_article))
        .with_state(state)
}
