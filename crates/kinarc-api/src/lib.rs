//! Kinarc API Library
//!
//! HTTP handlers, session verification, application state, and setup for
//! the family-archive service.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use error::ErrorResponse;
