//! Autocomplete handlers for Discord slash command parameters.
//!
//! Product and store suggestions come from the in-memory [`CatalogCache`](crate::cache::CatalogCache)
//! rather than the database, since Discord calls these on every keystroke.

use crate::{bot::Context, core::catalog::normalize_text};

/// Discord autocomplete limit
const MAX_CHOICES: usize = 25;

/// Provides autocomplete suggestions for product names.
///
/// Returns up to 25 distinct names from the active catalog containing the partial
/// input, compared case- and accent-insensitively, sorted alphabetically.
pub async fn autocomplete_product_name(ctx: Context<'_>, partial: &str) -> Vec<String> {
    ctx.data().catalog.product_names(partial, MAX_CHOICES).await
}

/// Provides autocomplete suggestions for store names.
pub async fn autocomplete_store(ctx: Context<'_>, partial: &str) -> Vec<String> {
    ctx.data().catalog.store_names(partial, MAX_CHOICES).await
}

/// Provides autocomplete suggestions for category names.
///
/// Categories come from the `categories` list in `config.toml`.
pub async fn autocomplete_category(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let needle = normalize_text(partial);
    let mut matching: Vec<String> = ctx
        .data()
        .categories
        .iter()
        .filter(|cat| normalize_text(cat).contains(&needle))
        .take(MAX_CHOICES)
        .cloned()
        .collect();

    matching.sort();
    matching
}
