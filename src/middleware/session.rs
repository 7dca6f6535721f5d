use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::{error::AppError, routes::AppState, services::session::resolve_session};

pub use crate::services::session::Session;

/// Header carrying the opaque session token issued by the OAuth callback
pub const SESSION_HEADER: &str = "x-session-token";

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session_token = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                AppError::Unauthorized(format!(
                    "Missing {} header. Please login at /auth/google.",
                    SESSION_HEADER
                ))
            })?;

        resolve_session(state.users.as_ref(), state.oauth.as_ref(), session_token).await
    }
}
