//! Bootstrap data.

use sqlx::PgPool;

use crate::{
    config::Config,
    models::user::{User, UserRole},
    repositories::user as user_repo,
    utils::password::hash_password,
};

/// Inserts the default manager account unless its username is taken.
/// Returns `true` when a row was created.
pub async fn seed_default_manager(pool: &PgPool, config: &Config) -> anyhow::Result<bool> {
    let password_hash = hash_password(&config.default_manager_password)?;
    let manager = User::approved(
        config.default_manager_username.clone(),
        password_hash,
        UserRole::Manager,
    );
    let created = user_repo::insert_if_username_absent(pool, &manager).await?;
    if created {
        tracing::info!(
            username = %manager.username,
            "seeded default manager account"
        );
    }
    Ok(created)
}
