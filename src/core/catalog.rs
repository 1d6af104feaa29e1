//! Catalog business logic - Handles all product-related operations.
//!
//! This module provides functions for uploading, retrieving, searching and removing
//! products. A product is one price observation of an item at one store; products that
//! share a normalized name form a name group, which is what price comparison works on.
//! Removal is a soft delete so that carts and purchase history keep their references.

use crate::{
    config::catalog::Config,
    entities::{Product, product},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::{BTreeSet, HashMap};
use tracing::{info, instrument};
use unicode_normalization::UnicodeNormalization;

/// Lower-cases `text`, strips surrounding whitespace and removes diacritics, so
/// "Jabón" and "JABON" compare equal.
///
/// Diacritics are removed by decomposing to NFD and dropping the combining marks
/// in U+0300..=U+036F.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect()
}

fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput {
            message: format!("Product {field} cannot be empty"),
        });
    }
    Ok(trimmed.to_string())
}

/// Retrieves all active (non-deleted) products, ordered by name then price.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_all_active_products<C>(db: &C) -> Result<Vec<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find()
        .filter(product::Column::IsDeleted.eq(false))
        .order_by_asc(product::Column::NameLower)
        .order_by_asc(product::Column::Price)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID, deleted or not.
pub async fn get_product_by_id<C>(db: &C, product_id: i64) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns every active variant of a product name, cheapest first.
pub async fn get_products_by_name<C>(db: &C, name: &str) -> Result<Vec<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find()
        .filter(product::Column::NameLower.eq(normalize_text(name)))
        .filter(product::Column::IsDeleted.eq(false))
        .order_by_asc(product::Column::Price)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds the active product with this name sold at this store.
///
/// Both the name and the store are compared case- and accent-insensitively.
pub async fn find_product(
    db: &DatabaseConnection,
    name: &str,
    store: &str,
) -> Result<Option<product::Model>> {
    let store_key = normalize_text(store);
    Ok(get_products_by_name(db, name)
        .await?
        .into_iter()
        .find(|p| normalize_text(&p.store) == store_key))
}

/// Uploads a new product to the catalog, performing input validation.
///
/// # Errors
/// Returns an error if:
/// - The name, store or category is empty or whitespace-only
/// - The price is negative or not finite (NaN, infinity)
/// - The database insert operation fails
#[instrument(skip(db))]
pub async fn create_product<C>(
    db: &C,
    name: &str,
    price: f64,
    store: &str,
    category: &str,
) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    let name = require_text("name", name)?;
    let store = require_text("store", store)?;
    let category = require_text("category", category)?;

    if !price.is_finite() || price < 0.0 {
        return Err(Error::InvalidAmount { amount: price });
    }

    let now = chrono::Utc::now().naive_utc();
    let product = product::ActiveModel {
        name_lower: Set(normalize_text(&name)),
        name: Set(name),
        price: Set(price),
        store: Set(store),
        category: Set(category),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = product.insert(db).await?;
    info!(product_id = created.id, "Product uploaded");
    Ok(created)
}

/// Soft deletes a product by marking it as deleted.
///
/// # Errors
/// Returns an error if the product does not exist or is already deleted.
#[instrument(skip(db))]
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<product::Model> {
    let mut product: product::ActiveModel = get_product_by_id(db, product_id)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            name: product_id.to_string(),
        })?
        .into();

    if *product.is_deleted.as_ref() {
        return Err(Error::ProductNotFound {
            name: product_id.to_string(),
        });
    }

    product.is_deleted = Set(true);
    product.updated_at = Set(chrono::Utc::now().naive_utc());

    product.update(db).await.map_err(Into::into)
}

/// True when `term` (already normalized) appears in the product's name, store, category
/// or the plain text of its price.
fn matches_term(product: &product::Model, normalized_term: &str, raw_term: &str) -> bool {
    product.name_lower.contains(normalized_term)
        || normalize_text(&product.store).contains(normalized_term)
        || normalize_text(&product.category).contains(normalized_term)
        || product.price.to_string().contains(raw_term)
}

/// Filters a product list by a free-text term. An empty term matches nothing.
#[must_use]
pub fn search(products: &[product::Model], term: &str) -> Vec<product::Model> {
    let raw_term = term.trim();
    if raw_term.is_empty() {
        return Vec::new();
    }
    let normalized = normalize_text(raw_term);
    products
        .iter()
        .filter(|p| matches_term(p, &normalized, raw_term))
        .cloned()
        .collect()
}

/// Searches the active catalog by name, store, category or price.
pub async fn search_products(db: &DatabaseConnection, term: &str) -> Result<Vec<product::Model>> {
    let products = get_all_active_products(db).await?;
    Ok(search(&products, term))
}

/// Optional category and price-range restrictions for browsing the catalog.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Only products in this category (case- and accent-insensitive)
    pub category: Option<String>,
    /// Inclusive lower bound on price
    pub min_price: Option<f64>,
    /// Inclusive upper bound on price
    pub max_price: Option<f64>,
}

impl ProductFilter {
    /// Whether a product passes every restriction that is set.
    #[must_use]
    pub fn matches(&self, product: &product::Model) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|c| normalize_text(c) == normalize_text(&product.category));
        let min_ok = self.min_price.is_none_or(|min| product.price >= min);
        let max_ok = self.max_price.is_none_or(|max| product.price <= max);
        category_ok && min_ok && max_ok
    }
}

/// Applies a [`ProductFilter`] to a product list.
#[must_use]
pub fn filter_products(products: &[product::Model], filter: &ProductFilter) -> Vec<product::Model> {
    products
        .iter()
        .filter(|p| filter.matches(p))
        .cloned()
        .collect()
}

/// Picks the cheapest product of every name group, ordered by name.
///
/// When two variants share the lowest price the one listed first wins.
#[must_use]
pub fn best_prices(products: &[product::Model]) -> Vec<product::Model> {
    let mut cheapest: HashMap<String, &product::Model> = HashMap::new();
    for product in products {
        cheapest
            .entry(normalize_text(&product.name))
            .and_modify(|best| {
                if product.price < best.price {
                    *best = product;
                }
            })
            .or_insert(product);
    }

    let mut best: Vec<product::Model> = cheapest.into_values().cloned().collect();
    best.sort_by(|a, b| a.name_lower.cmp(&b.name_lower));
    best
}

/// Products matching a comparison search, cheapest first.
#[derive(Debug, Clone, Default)]
pub struct PriceComparison {
    /// Matching products sorted by ascending price
    pub products: Vec<product::Model>,
    /// Most expensive minus cheapest match; zero with fewer than two matches
    pub price_difference: f64,
}

impl PriceComparison {
    /// The cheapest match, if any.
    #[must_use]
    pub fn best(&self) -> Option<&product::Model> {
        self.products.first()
    }
}

/// Compares every product whose name contains `term`.
#[must_use]
pub fn compare(products: &[product::Model], term: &str) -> PriceComparison {
    let normalized = normalize_text(term);
    if normalized.is_empty() {
        return PriceComparison::default();
    }

    let mut matching: Vec<product::Model> = products
        .iter()
        .filter(|p| p.name_lower.contains(&normalized))
        .cloned()
        .collect();
    matching.sort_by(|a, b| a.price.total_cmp(&b.price));

    let price_difference = match (matching.first(), matching.last()) {
        (Some(low), Some(high)) => high.price - low.price,
        _ => 0.0,
    };

    PriceComparison {
        products: matching,
        price_difference,
    }
}

/// Loads the active catalog and compares every product whose name contains `term`.
pub async fn compare_prices(db: &DatabaseConnection, term: &str) -> Result<PriceComparison> {
    let products = get_all_active_products(db).await?;
    Ok(compare(&products, term))
}

/// Suggests up to `limit` distinct product names containing `partial`.
///
/// The display spelling of the first product seen for each name is returned.
#[must_use]
pub fn suggest_names(products: &[product::Model], partial: &str, limit: usize) -> Vec<String> {
    let normalized = normalize_text(partial);
    if normalized.is_empty() {
        return Vec::new();
    }

    let mut seen = BTreeSet::new();
    products
        .iter()
        .filter(|p| p.name_lower.contains(&normalized))
        .filter(|p| seen.insert(p.name_lower.clone()))
        .map(|p| p.name.clone())
        .take(limit)
        .collect()
}

/// Distinct categories of the active catalog, sorted.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<String>> {
    let products = get_all_active_products(db).await?;
    let categories: BTreeSet<String> = products.into_iter().map(|p| p.category).collect();
    Ok(categories.into_iter().collect())
}

/// Inserts the configured seed products when the catalog has no active product.
///
/// Returns the number of products inserted. All inserts share one transaction.
#[instrument(skip(db, config))]
pub async fn seed_catalog(db: &DatabaseConnection, config: &Config) -> Result<usize> {
    let existing = Product::find()
        .filter(product::Column::IsDeleted.eq(false))
        .count(db)
        .await?;
    if existing > 0 || config.products.is_empty() {
        info!(existing, "Catalog seed skipped");
        return Ok(0);
    }

    let txn = db.begin().await?;
    for seed in &config.products {
        create_product(&txn, &seed.name, seed.price, &seed.store, &seed.category).await?;
    }
    txn.commit().await?;

    info!(count = config.products.len(), "Catalog seeded");
    Ok(config.products.len())
}
