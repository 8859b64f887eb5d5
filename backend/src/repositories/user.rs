//! Repository functions for accounts and the role approval workflow.

use sqlx::{PgExecutor, PgPool};

use crate::{
    models::user::{RoleHolder, User, UserRole, UserStatus},
    types::UserId,
};

const SELECT_COLUMNS: &str =
    "id, username, name, email, password_hash, role, status, created_at, updated_at";

pub async fn find_by_id<'e>(
    db: impl PgExecutor<'e>,
    user_id: UserId,
) -> Result<Option<User>, sqlx::Error> {
    let query = format!("SELECT {} FROM users WHERE id = $1", SELECT_COLUMNS);
    sqlx::query_as::<_, User>(&query)
        .bind(user_id)
        .fetch_optional(db)
        .await
}

/// Looks a user up by username or email, ignoring case.
pub async fn find_by_login(pool: &PgPool, identifier: &str) -> Result<Option<User>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM users \
         WHERE LOWER(username) = LOWER($1) OR LOWER(email) = LOWER($1) \
         ORDER BY (LOWER(username) = LOWER($1)) DESC \
         LIMIT 1",
        SELECT_COLUMNS
    );
    sqlx::query_as::<_, User>(&query)
        .bind(identifier.trim())
        .fetch_optional(pool)
        .await
}

pub async fn insert<'e>(db: impl PgExecutor<'e>, user: &User) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO users (id, username, name, email, password_hash, role, status, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role)
    .bind(user.status)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(db)
    .await
    .map(|_| ())
}

/// Inserts `user` unless an account with the same username exists.
pub async fn insert_if_username_absent(pool: &PgPool, user: &User) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO users (id, username, name, email, password_hash, role, status, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT (username) DO NOTHING",
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role)
    .bind(user.status)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Assignable roles currently held by a pending or approved user.
pub async fn occupied_roles<'e>(db: impl PgExecutor<'e>) -> Result<Vec<UserRole>, sqlx::Error> {
    sqlx::query_scalar::<_, UserRole>(
        "SELECT DISTINCT role FROM users \
         WHERE role IN ('dispatcher', 'safety_officer', 'financial_analyst') \
           AND status IN ('pending', 'approved')",
    )
    .fetch_all(db)
    .await
}

/// Whether some other pending or approved user already holds `role`.
pub async fn role_conflict_exists<'e>(
    db: impl PgExecutor<'e>,
    role: UserRole,
    excluding: UserId,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users \
         WHERE role = $1 AND status IN ('pending', 'approved') AND id <> $2)",
    )
    .bind(role)
    .bind(excluding)
    .fetch_one(db)
    .await
}

pub async fn set_status<'e>(
    db: impl PgExecutor<'e>,
    user_id: UserId,
    status: UserStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET status = $1, updated_at = NOW() WHERE id = $2")
        .bind(status)
        .bind(user_id)
        .execute(db)
        .await
        .map(|_| ())
}

/// Permanently deletes a user; session tokens cascade.
pub async fn delete(pool: &PgPool, user_id: UserId) -> Result<u64, sqlx::Error> {
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await
        .map(|result| result.rows_affected())
}

pub async fn pending_role_requests(pool: &PgPool) -> Result<Vec<RoleHolder>, sqlx::Error> {
    sqlx::query_as::<_, RoleHolder>(
        "SELECT id, name, email, role FROM users \
         WHERE status = 'pending' AND role <> 'manager' \
         ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn approved_role_users(pool: &PgPool) -> Result<Vec<RoleHolder>, sqlx::Error> {
    sqlx::query_as::<_, RoleHolder>(
        "SELECT id, name, email, role FROM users \
         WHERE status = 'approved' AND role IN ('dispatcher', 'safety_officer', 'financial_analyst') \
         ORDER BY role",
    )
    .fetch_all(pool)
    .await
}
