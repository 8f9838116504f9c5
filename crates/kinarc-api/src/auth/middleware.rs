use crate::auth::session::{verify_session_token, SessionContext};
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use kinarc_core::AppError;
use std::sync::Arc;

/// State for the session middleware: the HS256 secret shared with the
/// external session provider.
#[derive(Clone)]
pub struct AuthState {
    pub session_jwt_secret: String,
}

/// Verify the `Authorization: Bearer` session token and insert a
/// [`SessionContext`] into request extensions. Rejects with 401 before any
/// storage or database interaction.
pub async fn session_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
    {
        Some(token) => token,
        None => {
            return HttpAppError(AppError::Unauthorized(
                "missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    let context = match verify_session_token(token, &auth_state.session_jwt_secret) {
        Ok(claims) => SessionContext::from(claims),
        Err(err) => return HttpAppError(err).into_response(),
    };

    tracing::debug!(user_id = %context.user_id, "Session verified");

    request.extensions_mut().insert(context);
    next.run(request).await
}
