//! Application state.
//!
//! All client handles (database pool, object store gateway) are
//! constructed once at startup and injected into handlers through
//! `Arc<AppState>`; nothing is an ambient singleton.

use kinarc_core::Config;
use kinarc_db::{ArticleRepository, MediaRepository, UserRepository};
use kinarc_storage::ObjectGateway;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

/// Media pipeline dependencies.
#[derive(Clone)]
pub struct MediaState {
    pub repository: MediaRepository,
    pub storage: Arc<dyn ObjectGateway>,
    /// Expiry window for presigned PUT URLs.
    pub presign_expiry: Duration,
}

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub media: MediaState,
    pub users: UserRepository,
    pub articles: ArticleRepository,
    pub config: Config,
    pub is_production: bool,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool, storage: Arc<dyn ObjectGateway>) -> Self {
        let is_production = config.is_production();
        AppState {
            media: MediaState {
                repository: MediaRepository::new(pool.clone()),
                storage,
                presign_expiry: Duration::from_secs(config.presign_expiry_secs),
            },
            users: UserRepository::new(pool.clone()),
            articles: ArticleRepository::new(pool.clone()),
            pool,
            config,
            is_production,
        }
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
