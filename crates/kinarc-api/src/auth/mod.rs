//! Session verification.
//!
//! Sign-in itself is owned by the external OAuth provider (Google/LINE);
//! this service only verifies the HS256 session token the provider issues
//! and exposes the caller's identity to handlers.

pub mod middleware;
pub mod session;

pub use session::SessionContext;
