//! Kinarc Storage Library
//!
//! Object store gateway for the family archive: a small trait over the
//! S3-compatible backend plus an in-memory implementation used by tests.
//!
//! # Storage key format
//!
//! Original uploads live under
//! `originals/{owner_id}/{yyyy}/{mm}/{file_id}_{sanitized_filename}`.
//! Key generation is centralized in the [`keys`] module so both upload
//! paths produce identical keys.

pub mod keys;
pub mod memory;
pub mod s3;
pub mod traits;

pub use memory::MemoryGateway;
pub use s3::S3Gateway;
pub use traits::{ObjectBody, ObjectGateway, StorageError, StorageResult};
