use price_buddy::{
    bot,
    config::{catalog, database},
    core,
    errors::{Error, Result},
};
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenvy::dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load config.toml (categories and catalog seed)
    let config = catalog::load_default_config()
        .inspect_err(|e| error!("Failed to load config.toml: {}", e))?;

    // 4. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;
    info!("Database initialized successfully.");

    // 5. Seed the catalog on first run
    core::catalog::seed_catalog(&db, &config)
        .await
        .inspect(|count| info!("Catalog seed inserted {} products.", count))
        .inspect_err(|e| error!("Failed to seed catalog: {}", e))?;

    // 6. Run the bot
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, config, db).await
}
