//! Google OAuth 2.0 authorization-code flow
//!
//! Builds the consent URL, exchanges authorization codes and refreshes
//! expired access tokens. Token persistence lives in [`crate::db::users`].

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use reqwest::{Client as HttpClient, Url};
use serde::Deserialize;

use crate::{
    config::Config,
    error::{AppError, AppResult},
};

pub const YOUTUBE_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/youtube.readonly",
    "https://www.googleapis.com/auth/youtube.force-ssl",
];

/// Token endpoint response
#[derive(Clone, PartialEq, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<i64>,
}

impl TokenGrant {
    /// Absolute expiry. A lifetime too large to represent counts as no expiry.
    pub fn expires_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.expires_in
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
    }
}

impl fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGrant")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait OAuthProvider: Send + Sync {
    /// URL the user is redirected to for consent
    fn authorization_url(&self) -> String;

    async fn exchange_code(&self, code: &str) -> AppResult<TokenGrant>;

    async fn refresh_access_token(&self, refresh_token: &str) -> AppResult<TokenGrant>;
}

#[derive(Clone)]
pub struct GoogleOAuth {
    http_client: HttpClient,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    auth_url: String,
    token_url: String,
}

impl GoogleOAuth {
    pub fn new(
        client_id: String,
        client_secret: String,
        redirect_uri: String,
        auth_url: String,
        token_url: String,
    ) -> Self {
        Self {
            http_client: HttpClient::new(),
            client_id,
            client_secret,
            redirect_uri,
            auth_url,
            token_url,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.google_client_id.clone(),
            config.google_client_secret.clone(),
            config.google_redirect_uri.clone(),
            config.google_auth_url.clone(),
            config.google_token_url.clone(),
        )
    }

    async fn request_token(&self, params: &[(&str, &str)], operation: &str) -> AppResult<TokenGrant> {
        let response = self
            .http_client
            .post(&self.token_url)
            .form(params)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, operation = %operation, "Token endpoint unreachable");
                AppError::UpstreamFetch(format!("Token endpoint request failed during {}: {}", operation, e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                operation = %operation,
                status = %status,
                body = %body,
                "Token endpoint request failed"
            );
            return Err(AppError::UpstreamFetch(format!(
                "Token endpoint returned status {} during {}",
                status, operation
            )));
        }

        response.json::<TokenGrant>().await.map_err(|e| {
            AppError::UpstreamFetch(format!("Failed to parse token response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl OAuthProvider for GoogleOAuth {
    fn authorization_url(&self) -> String {
        let scope = YOUTUBE_SCOPES.join(" ");
        let params = [
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", scope.as_str()),
            // Required for refresh tokens
            ("access_type", "offline"),
            ("prompt", "consent"),
        ];

        match Url::parse_with_params(&self.auth_url, &params) {
            Ok(url) => url.to_string(),
            Err(e) => {
                tracing::error!(error = %e, auth_url = %self.auth_url, "Invalid OAuth endpoint");
                self.auth_url.clone()
            }
        }
    }

    async fn exchange_code(&self, code: &str) -> AppResult<TokenGrant> {
        let grant = self
            .request_token(
                &[
                    ("code", code),
                    ("client_id", self.client_id.as_str()),
                    ("client_secret", self.client_secret.as_str()),
                    ("redirect_uri", self.redirect_uri.as_str()),
                    ("grant_type", "authorization_code"),
                ],
                "code exchange",
            )
            .await?;

        tracing::info!(
            has_refresh_token = grant.refresh_token.is_some(),
            "Authorization code exchanged"
        );

        Ok(grant)
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> AppResult<TokenGrant> {
        self.request_token(
            &[
                ("refresh_token", refresh_token),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "refresh_token"),
            ],
            "token refresh",
        )
        .await
    }
}
