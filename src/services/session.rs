use chrono::Utc;

use crate::{
    db::UserStore,
    error::{AppError, AppResult},
    models::Credentials,
    services::oauth::OAuthProvider,
};

const LOGIN_HINT: &str = "No credentials found. Please login at /auth/google.";

/// Authenticated caller: the channel id plus fresh credentials for it
#[derive(Debug, Clone)]
pub struct Session {
    pub channel_id: String,
    pub credentials: Credentials,
}

/// Loads the user owning `session_token`, refreshing and persisting the
/// access token first when it has expired.
pub async fn resolve_session(
    store: &dyn UserStore,
    oauth: &dyn OAuthProvider,
    session_token: &str,
) -> AppResult<Session> {
    let user = store
        .find_by_session(session_token)
        .await?
        .filter(|user| !user.access_token.is_empty())
        .ok_or_else(|| AppError::Unauthorized(LOGIN_HINT.to_string()))?;

    let now = Utc::now();
    if !user.is_expired(now) {
        return Ok(Session {
            credentials: user.credentials(),
            channel_id: user.channel_id,
        });
    }

    let Some(refresh_token) = user.refresh_token.as_deref() else {
        tracing::warn!(channel_id = %user.channel_id, "Token expired and no refresh token stored");
        return Err(AppError::Unauthorized(
            "Session expired. Please login again at /auth/google.".to_string(),
        ));
    };

    tracing::info!(channel_id = %user.channel_id, "Token expired, refreshing");

    let grant = oauth.refresh_access_token(refresh_token).await?;
    store
        .update_access_token(&user.channel_id, &grant.access_token, grant.expires_at(now))
        .await?;

    Ok(Session {
        channel_id: user.channel_id,
        credentials: Credentials::new(grant.access_token),
    })
}
