//! Library lending store bootstrap
//!
//! Prepares the database (migrations, administrator account) and reports the
//! current catalog figures.

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use library_lending::{config::AppConfig, Library};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.log_directive().into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting library-lending v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("Database migrations completed");

    let library = Library::new(config, pool);

    let admin = library.bootstrap().await?;
    let stats = library.statistics(&admin).await?;

    tracing::info!(
        "Catalog ready: {} titles, {}/{} copies available, {} active borrows ({} overdue)",
        stats.total_titles,
        stats.available_copies,
        stats.total_copies,
        stats.active_borrows,
        stats.overdue_borrows
    );

    println!("{}", serde_json::to_string_pretty(&stats)?);

    Ok(())
}
