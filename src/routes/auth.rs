use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Redirect,
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{Credentials, UserRecord},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackResponse {
    pub message: String,
    /// Value to send back in the `x-session-token` header
    pub session_token: String,
}

/// Redirects the browser to Google's consent screen
pub async fn login(State(state): State<Arc<AppState>>) -> Redirect {
    Redirect::temporary(&state.oauth.authorization_url())
}

/// Exchanges the authorization code and stores the resulting credentials
pub async fn callback(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<CallbackQuery>,
) -> AppResult<Json<CallbackResponse>> {
    if let Some(error) = query.error {
        return Err(AppError::InvalidInput(format!(
            "Authorization was not granted: {}",
            error
        )));
    }

    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::InvalidInput("No authorization code provided.".to_string()))?;

    let now = Utc::now();
    let grant = state.oauth.exchange_code(&code).await?;
    let credentials = Credentials::new(grant.access_token.clone());
    let channel_id = state.platform.fetch_channel_id(&credentials).await?;

    let expires_at = grant.expires_at(now);
    let user = UserRecord::new(
        channel_id.clone(),
        grant.access_token,
        grant.refresh_token,
        expires_at,
    );
    state.users.upsert(&user).await?;

    tracing::info!(
        request_id = %request_id,
        channel_id = %channel_id,
        "Successfully authenticated"
    );

    Ok(Json(CallbackResponse {
        message: "Authentication successful! You can now close this tab and return to the app."
            .to_string(),
        session_token: user.session_token,
    }))
}
