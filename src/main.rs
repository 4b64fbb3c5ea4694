use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use oso_booking::cache::start_cache_warmer;
use oso_booking::{create_router, AppCache, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real deployments set the environment directly
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("Starting OSO booking service...");

    let db = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    info!("Connected to database");

    let cache = AppCache::new();
    tokio::spawn(start_cache_warmer(
        cache.clone(),
        db.clone(),
        config.cache_warm_interval,
    ));

    let address = config.address();
    let app = create_router(AppState::new(db, cache, config));

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    info!("Listening on {}", address);

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
