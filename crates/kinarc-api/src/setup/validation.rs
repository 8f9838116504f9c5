//! Startup configuration validation. Fail fast on misconfiguration
//! instead of surfacing it request by request.

use anyhow::{bail, Result};
use kinarc_core::Config;

const MIN_SECRET_LEN: usize = 32;

pub fn validate_config(config: &Config) -> Result<()> {
    if config.session_jwt_secret.len() < MIN_SECRET_LEN {
        bail!(
            "SESSION_JWT_SECRET must be at least {} characters",
            MIN_SECRET_LEN
        );
    }
    if config.presign_expiry_secs == 0 {
        bail!("PRESIGN_EXPIRY_SECS must be greater than zero");
    }
    if config.max_upload_size_bytes == 0 {
        bail!("MAX_UPLOAD_SIZE_BYTES must be greater than zero");
    }
    if config.r2.bucket.is_none() {
        tracing::warn!(
            "Object store bucket not configured; media endpoints will fail until CLOUDFLARE_R2_* is set"
        );
    }
    Ok(())
}
