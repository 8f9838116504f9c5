//! Object store gateway setup.

use anyhow::{Context, Result};
use kinarc_core::Config;
use kinarc_storage::{ObjectGateway, S3Gateway};
use std::sync::Arc;

pub fn setup_storage(config: &Config) -> Result<Arc<dyn ObjectGateway>> {
    let gateway = S3Gateway::new(&config.r2).context("Failed to configure object store")?;
    tracing::info!(
        bucket = config.r2.bucket.as_deref().unwrap_or(""),
        public_url_configured = config.r2.public_base_url.is_some(),
        "Object store gateway ready"
    );
    Ok(Arc::new(gateway))
}
