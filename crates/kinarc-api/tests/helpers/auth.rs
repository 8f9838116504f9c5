//! Session token helpers for integration tests.

#![allow(dead_code)]

use jsonwebtoken::{encode, EncodingKey, Header};
use kinarc_api::auth::session::SessionClaims;
use uuid::Uuid;

pub const TEST_SESSION_SECRET: &str = "integration-test-session-secret-0123456789";

/// A signed-in test user: a stable id and a valid session token.
pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

pub fn test_user() -> TestUser {
    test_user_with_email("taro@example.com")
}

pub fn test_user_with_email(email: &str) -> TestUser {
    let id = Uuid::new_v4();
    TestUser {
        id,
        token: session_token(id, Some(email)),
    }
}

/// Sign a session token the way the external provider would.
pub fn session_token(user_id: Uuid, email: Option<&str>) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = SessionClaims {
        sub: user_id,
        email: email.map(|e| e.to_string()),
        name: Some("Test User".to_string()),
        picture: None,
        exp: now + 3600,
        iat: Some(now),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SESSION_SECRET.as_bytes()),
    )
    .expect("Failed to sign test session token")
}

pub fn bearer(user: &TestUser) -> String {
    format!("Bearer {}", user.token)
}
