use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fleetflow_backend::{
    config::Config, db::connection::create_pool, repositories::auth as auth_repo,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fleetflow_backend=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    let pool = create_pool(&config.database_url).await?;

    let deleted_access = auth_repo::cleanup_expired_access_tokens(&pool).await?;
    let deleted_refresh = auth_repo::cleanup_expired_refresh_tokens(&pool).await?;
    tracing::info!(deleted_access, deleted_refresh, "expired tokens removed");

    sqlx::query("VACUUM (ANALYZE) active_access_tokens")
        .execute(&pool)
        .await?;
    sqlx::query("VACUUM (ANALYZE) refresh_tokens")
        .execute(&pool)
        .await?;

    Ok(())
}
