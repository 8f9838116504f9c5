use crate::error::ErrorResponse;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use axum::Json;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use kinarc_core::models::SessionIdentity;
use kinarc_core::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by the externally issued session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Stable user id
    pub sub: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

/// Caller identity extracted from the verified session token and stored in
/// request extensions by the session middleware.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
}

impl SessionContext {
    pub fn identity(&self) -> SessionIdentity {
        SessionIdentity {
            user_id: self.user_id,
            email: self.email.clone(),
            name: self.name.clone(),
            image: self.image.clone(),
        }
    }
}

impl From<SessionClaims> for SessionContext {
    fn from(claims: SessionClaims) -> Self {
        SessionContext {
            user_id: claims.sub,
            email: claims.email,
            name: claims.name,
            image: claims.picture,
        }
    }
}

/// Verify a session token signature and expiry.
pub fn verify_session_token(token: &str, secret: &str) -> Result<SessionClaims, AppError> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("invalid session token: {}", e)))
}

// FromRequestParts so handlers taking Multipart can still extract the
// session: Extension cannot be combined with a body-consuming extractor.
impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionContext>()
            .cloned()
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorResponse {
                        error: "Unauthorized".to_string(),
                        code: "UNAUTHORIZED".to_string(),
                        details: None,
                    }),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-session-secret-at-least-32-chars!!";

    fn claims(exp_offset_secs: i64) -> SessionClaims {
        SessionClaims {
            sub: Uuid::new_v4(),
            email: Some("taro@example.com".to_string()),
            name: Some("Taro".to_string()),
            picture: None,
            exp: chrono::Utc::now().timestamp() + exp_offset_secs,
            iat: Some(chrono::Utc::now().timestamp()),
        }
    }

    fn sign(claims: &SessionClaims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_yields_claims() {
        let claims = claims(3600);
        let token = sign(&claims, SECRET);
        let verified = verify_session_token(&token, SECRET).unwrap();
        assert_eq!(verified.sub, claims.sub);
        assert_eq!(verified.email.as_deref(), Some("taro@example.com"));
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let token = sign(&claims(-3600), SECRET);
        assert!(matches!(
            verify_session_token(&token, SECRET),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn wrong_secret_is_unauthorized() {
        let token = sign(&claims(3600), "another-secret-that-is-also-32-chars!");
        assert!(matches!(
            verify_session_token(&token, SECRET),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn garbage_token_is_unauthorized() {
        assert!(matches!(
            verify_session_token("not-a-jwt", SECRET),
            Err(AppError::Unauthorized(_))
        ));
    }
}
