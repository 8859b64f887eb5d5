//! Session storage: rotating refresh tokens and revocable access-token ids.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgExecutor};

use crate::{types::UserId, utils::jwt::RefreshToken};

#[derive(Debug, FromRow)]
pub struct StoredRefreshToken {
    pub id: String,
    pub user_id: UserId,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

pub async fn insert_refresh_token<'e>(
    db: impl PgExecutor<'e>,
    token: &RefreshToken,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(&token.id)
    .bind(&token.user_id)
    .bind(&token.token_hash)
    .bind(token.expires_at)
    .execute(db)
    .await
    .map(|_| ())
}

/// Removes a refresh token and returns it if it was still valid.
///
/// A token can only be consumed once; a concurrent second caller gets `None`.
pub async fn consume_refresh_token<'e>(
    db: impl PgExecutor<'e>,
    token_id: &str,
) -> Result<Option<StoredRefreshToken>, sqlx::Error> {
    let consumed = sqlx::query_as::<_, StoredRefreshToken>(
        "DELETE FROM refresh_tokens WHERE id = $1 \
         RETURNING id, user_id, token_hash, expires_at",
    )
    .bind(token_id)
    .fetch_optional(db)
    .await?;
    Ok(consumed.filter(|token| token.expires_at > Utc::now()))
}

pub async fn delete_refresh_tokens_for_user<'e>(
    db: impl PgExecutor<'e>,
    user_id: UserId,
) -> Result<u64, sqlx::Error> {
    sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
        .bind(user_id)
        .execute(db)
        .await
        .map(|result| result.rows_affected())
}

/// Records an issued access token so it can be revoked before expiry.
pub async fn insert_active_access_token<'e>(
    db: impl PgExecutor<'e>,
    jti: &str,
    user_id: UserId,
    expires_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO active_access_tokens (jti, user_id, expires_at) VALUES ($1, $2, $3)")
        .bind(jti)
        .bind(user_id)
        .bind(expires_at)
        .execute(db)
        .await
        .map(|_| ())
}

pub async fn access_token_exists<'e>(
    db: impl PgExecutor<'e>,
    jti: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM active_access_tokens WHERE jti = $1 AND expires_at > NOW())",
    )
    .bind(jti)
    .fetch_one(db)
    .await
}

pub async fn delete_active_access_token<'e>(
    db: impl PgExecutor<'e>,
    jti: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM active_access_tokens WHERE jti = $1")
        .bind(jti)
        .execute(db)
        .await
        .map(|_| ())
}

pub async fn cleanup_expired_access_tokens<'e>(db: impl PgExecutor<'e>) -> Result<u64, sqlx::Error> {
    sqlx::query("DELETE FROM active_access_tokens WHERE expires_at <= NOW()")
        .execute(db)
        .await
        .map(|result| result.rows_affected())
}

pub async fn cleanup_expired_refresh_tokens<'e>(
    db: impl PgExecutor<'e>,
) -> Result<u64, sqlx::Error> {
    sqlx::query("DELETE FROM refresh_tokens WHERE expires_at <= NOW()")
        .execute(db)
        .await
        .map(|result| result.rows_affected())
}
