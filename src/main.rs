use std::sync::Arc;

use pokedex::api::router::build_router;
use pokedex::config::AppConfig;
use pokedex::migration::Migrator;
use pokedex::storage::s3::S3ObjectStore;
use pokedex::{db, AppState};
use sea_orm_migration::MigratorTrait;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!("Pokédex API starting...");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Bucket: {} ({})", config.s3.bucket, config.s3.region);

    // Connect to database
    let db = db::connect(&config.database.url).await?;

    // Run migrations
    Migrator::up(&db, None).await?;
    tracing::info!("Database migrations complete");

    let store = Arc::new(S3ObjectStore::new(&config.s3));
    let state = AppState::new(db, store);

    // Build router
    let app = build_router(state, config.server.upload_max_bytes);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Pokédex API listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
