use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fleetflow_backend::{
    config::Config,
    db::{
        connection::{create_pool, run_migrations},
        seed::seed_default_manager,
    },
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
    run_migrations(&pool).await?;
    let created = seed_default_manager(&pool, &config).await?;

    println!("Database initialized.");
    if created {
        println!(
            "Default manager login: {} / {}",
            config.default_manager_username, config.default_manager_password
        );
    } else {
        println!(
            "Manager account '{}' already exists; password unchanged.",
            config.default_manager_username
        );
    }
    Ok(())
}
