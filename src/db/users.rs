use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{error::AppResult, models::UserRecord};

/// Keyed store of OAuth credentials, one record per YouTube channel
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Record owning `session_token`, if any
    async fn find_by_session(&self, session_token: &str) -> AppResult<Option<UserRecord>>;

    /// Inserts or replaces a record, including its session token, so a new
    /// login invalidates the previous token. A missing refresh token keeps
    /// the one already stored, since Google only issues it on first consent.
    async fn upsert(&self, user: &UserRecord) -> AppResult<()>;

    async fn update_access_token(
        &self,
        channel_id: &str,
        access_token: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<()>;
}

/// PostgreSQL-backed [`UserStore`]
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserStore for PgUserStore {
    async fn find_by_session(&self, session_token: &str) -> AppResult<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT channel_id, session_token, access_token, refresh_token, expires_at, created_at, updated_at
            FROM users
            WHERE session_token = $1
            "#,
        )
        .bind(session_token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn upsert(&self, user: &UserRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (channel_id, session_token, access_token, refresh_token, expires_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (channel_id) DO UPDATE SET
                session_token = EXCLUDED.session_token,
                access_token = EXCLUDED.access_token,
                refresh_token = COALESCE(EXCLUDED.refresh_token, users.refresh_token),
                expires_at = EXCLUDED.expires_at,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&user.channel_id)
        .bind(&user.session_token)
        .bind(&user.access_token)
        .bind(&user.refresh_token)
        .bind(user.expires_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::info!(channel_id = %user.channel_id, "Stored user credentials");

        Ok(())
    }

    async fn update_access_token(
        &self,
        channel_id: &str,
        access_token: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET access_token = $2, expires_at = $3, updated_at = NOW()
            WHERE channel_id = $1
            "#,
        )
        .bind(channel_id)
        .bind(access_token)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(channel_id = %channel_id, "Access token updated");

        Ok(())
    }
}
