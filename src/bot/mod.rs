//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the PriceBuddy application,
//! including all slash commands, autocomplete handlers, and bot context management.

/// Discord command implementations (catalog, cart, profile, account, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    cache::{self, CatalogCache},
    config::catalog::Config,
    core::{
        account,
        feed::{ChangeEvent, ChangeFeed},
    },
    entities::user,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Poise context carrying [`BotData`].
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Shared data available to all bot commands.
/// This structure holds the database connection, the change feed and the
/// autocomplete cache that commands need to access.
pub struct BotData {
    /// Database connection shared with background tasks
    pub database: Arc<DatabaseConnection>,
    /// Publisher for catalog, cart and purchase changes
    pub feed: ChangeFeed,
    /// Active catalog snapshot for autocomplete
    pub catalog: CatalogCache,
    /// Categories offered when uploading a product
    pub categories: Vec<String>,
}

impl BotData {
    /// Creates a new `BotData` instance with an empty cache and a fresh feed.
    #[must_use]
    pub fn new(database: Arc<DatabaseConnection>, categories: Vec<String>) -> Self {
        Self {
            database,
            feed: ChangeFeed::default(),
            catalog: CatalogCache::new(),
            categories,
        }
    }

    /// The database connection, borrowed for core calls.
    #[must_use]
    pub fn db(&self) -> &DatabaseConnection {
        &self.database
    }

    /// Publishes a change to every subscriber.
    pub fn notify(&self, event: ChangeEvent) {
        self.feed.publish(event);
    }
}

/// Looks up the invoking user's account.
///
/// When the user has not signed up yet a hint pointing at `/signup` is sent and
/// `None` is returned, so commands can simply bail out.
pub async fn signed_in_user(ctx: Context<'_>) -> Result<Option<user::Model>> {
    let discord_id = ctx.author().id.to_string();
    match account::require_user(ctx.data().db(), &discord_id).await {
        Ok(user) => Ok(Some(user)),
        Err(Error::NotSignedUp) => {
            ctx.say("🔒 You need an account for that. Use `/signup` to create one.")
                .await?;
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("❌ An error occurred: {error}")).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Builds the poise framework, connects to Discord and runs until the client stops.
#[instrument(skip(token, config, database))]
pub async fn run_bot(token: String, config: Config, database: DatabaseConnection) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::signup(),
                commands::products(),
                commands::search(),
                commands::upload(),
                commands::compare(),
                commands::best_prices(),
                commands::remove_product(),
                commands::add_to_cart(),
                commands::cart(),
                commands::remove_from_cart(),
                commands::checkout(),
                commands::profile(),
                commands::reset_history(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                let data = BotData::new(Arc::new(database), config.categories);
                cache::refresh_catalog_cache(data.db(), &data.catalog).await?;
                if data.catalog.is_empty().await {
                    warn!("Catalog is empty, products can be added with /upload.");
                } else {
                    info!("Catalog cache primed with {} products.", data.catalog.len().await);
                }
                cache::spawn_catalog_watcher(
                    Arc::clone(&data.database),
                    &data.feed,
                    data.catalog.clone(),
                );
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}
