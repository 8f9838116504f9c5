//! Kinarc Core Library
//!
//! Shared configuration, error taxonomy, and domain models for the
//! family-archive service. The HTTP surface lives in `kinarc-api`,
//! persistence in `kinarc-db`, and object storage in `kinarc-storage`.

pub mod config;
pub mod error;
pub mod models;

pub use config::{Config, R2Config};
pub use error::{AppError, LogLevel};
