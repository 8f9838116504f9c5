//! Configuration module
//!
//! Env-var driven configuration for the server, database, session
//! verification, and the S3-compatible object store (Cloudflare R2 or any
//! provider speaking the S3 API). `Config::from_env` fails fast on missing
//! required settings; optional store settings are validated when the
//! gateway is constructed.

use std::env;

const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PRESIGN_EXPIRY_SECS: u64 = 300;
const DEFAULT_MAX_UPLOAD_SIZE_BYTES: usize = 50 * 1024 * 1024;

/// Object store settings (`CLOUDFLARE_R2_*` variables).
#[derive(Clone, Debug)]
pub struct R2Config {
    pub account_id: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub bucket: Option<String>,
    /// Explicit endpoint; when unset it is derived from the account id.
    pub endpoint: Option<String>,
    /// Public base URL for serving objects; when unset, URLs fall back to
    /// `{endpoint}/{bucket}/{key}`.
    pub public_base_url: Option<String>,
}

impl R2Config {
    fn from_env() -> Self {
        R2Config {
            account_id: env_opt("CLOUDFLARE_R2_ACCOUNT_ID"),
            access_key_id: env_opt("CLOUDFLARE_R2_ACCESS_KEY_ID"),
            secret_access_key: env_opt("CLOUDFLARE_R2_SECRET_ACCESS_KEY"),
            bucket: env_opt("CLOUDFLARE_R2_BUCKET_NAME"),
            endpoint: env_opt("CLOUDFLARE_R2_ENDPOINT"),
            public_base_url: env_opt("CLOUDFLARE_R2_PUBLIC_URL"),
        }
    }

    /// Effective endpoint: the explicit one, or the R2 endpoint derived from
    /// the account id.
    pub fn endpoint(&self) -> Option<String> {
        self.endpoint.clone().or_else(|| {
            self.account_id
                .as_ref()
                .map(|id| format!("https://{}.r2.cloudflarestorage.com", id))
        })
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    /// HS256 secret the external OAuth/session provider signs session
    /// tokens with. This service only verifies; it never issues tokens.
    pub session_jwt_secret: String,
    pub r2: R2Config,
    pub presign_expiry_secs: u64,
    pub max_upload_size_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable not set"))?;
        let session_jwt_secret = env::var("SESSION_JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("SESSION_JWT_SECRET environment variable not set"))?;

        Ok(Config {
            server_port: env_parse("PORT", DEFAULT_SERVER_PORT),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            database_url,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS),
            db_timeout_seconds: env_parse("DB_TIMEOUT_SECONDS", DEFAULT_CONNECTION_TIMEOUT_SECS),
            session_jwt_secret,
            r2: R2Config::from_env(),
            presign_expiry_secs: env_parse("PRESIGN_EXPIRY_SECS", DEFAULT_PRESIGN_EXPIRY_SECS),
            max_upload_size_bytes: env_parse(
                "MAX_UPLOAD_SIZE_BYTES",
                DEFAULT_MAX_UPLOAD_SIZE_BYTES,
            ),
        })
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
