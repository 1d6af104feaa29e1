//! In-memory snapshot of the active catalog used by autocomplete.
//!
//! Autocomplete fires on every keystroke, so it reads from this snapshot instead of the
//! database. The snapshot is refreshed whenever the change feed reports a catalog change.

use crate::{
    core::{
        catalog::{self, normalize_text},
        feed::{ChangeEvent, ChangeFeed, Scope, Subscription},
    },
    entities::product,
    errors::Result,
};
use sea_orm::DatabaseConnection;
use std::{collections::BTreeSet, sync::Arc};
use tokio::{sync::RwLock, task::JoinHandle};
use tracing::{error, info, trace};

/// Shared, cloneable handle to the cached active catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogCache {
    products: Arc<RwLock<Vec<product::Model>>>,
}

impl CatalogCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the cached catalog.
    pub async fn replace(&self, products: Vec<product::Model>) {
        *self.products.write().await = products;
    }

    /// Number of cached products.
    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    /// True when nothing is cached.
    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }

    /// Up to `limit` distinct product names containing `partial`, sorted.
    /// An empty `partial` lists names from the start of the catalog.
    pub async fn product_names(&self, partial: &str, limit: usize) -> Vec<String> {
        let products = self.products.read().await;
        let mut names: Vec<String> = if partial.trim().is_empty() {
            let mut seen = BTreeSet::new();
            products
                .iter()
                .filter(|p| seen.insert(p.name_lower.as_str()))
                .map(|p| p.name.clone())
                .take(limit)
                .collect()
        } else {
            catalog::suggest_names(&products, partial, limit)
        };
        names.sort();
        names
    }

    /// Up to `limit` distinct store names containing `partial`, sorted.
    pub async fn store_names(&self, partial: &str, limit: usize) -> Vec<String> {
        let needle = normalize_text(partial);
        let products = self.products.read().await;
        let mut seen = BTreeSet::new();
        let mut stores: Vec<String> = products
            .iter()
            .filter(|p| normalize_text(&p.store).contains(&needle))
            .filter(|p| seen.insert(normalize_text(&p.store)))
            .map(|p| p.store.clone())
            .take(limit)
            .collect();
        stores.sort();
        stores
    }
}

/// Reloads the active catalog from the database into the cache.
pub async fn refresh_catalog_cache(db: &DatabaseConnection, cache: &CatalogCache) -> Result<()> {
    trace!("Refreshing catalog cache...");
    let products = catalog::get_all_active_products(db).await.inspect_err(|e| {
        error!("DB error fetching catalog for cache: {}", e);
    })?;
    let count = products.len();
    cache.replace(products).await;
    info!("Catalog cache refreshed with {} products.", count);
    Ok(())
}

/// Refreshes the cache on every catalog change until the feed closes.
///
/// A failed refresh is logged and the previous snapshot is kept.
pub async fn watch_catalog(
    db: Arc<DatabaseConnection>,
    mut subscription: Subscription,
    cache: CatalogCache,
) {
    while let Some(event) = subscription.next().await {
        if event != ChangeEvent::CatalogChanged {
            continue;
        }
        if let Err(e) = refresh_catalog_cache(&db, &cache).await {
            error!("Failed to refresh catalog cache: {}", e);
        }
    }
    info!("Change feed closed, catalog watcher stopping.");
}

/// Subscribes to catalog changes and runs [`watch_catalog`] on a background task.
pub fn spawn_catalog_watcher(
    db: Arc<DatabaseConnection>,
    feed: &ChangeFeed,
    cache: CatalogCache,
) -> JoinHandle<()> {
    let subscription = feed.subscribe(Scope::Catalog);
    tokio::spawn(watch_catalog(db, subscription, cache))
}
