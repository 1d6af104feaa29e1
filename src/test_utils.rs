//! Shared test utilities for `PriceBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{account, catalog},
    entities::{cart_item, product, user},
    errors::Result,
};
use chrono::{NaiveDate, TimeZone, Utc};
use sea_orm::DatabaseConnection;

/// Category given to products created by the default helpers.
pub const TEST_CATEGORY: &str = "General";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Signs up a test user without an email.
pub async fn create_test_user(db: &DatabaseConnection, discord_id: &str) -> Result<user::Model> {
    account::sign_up(db, discord_id, None).await
}

/// Creates a test product in [`TEST_CATEGORY`].
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
    store: &str,
) -> Result<product::Model> {
    catalog::create_product(db, name, price, store, TEST_CATEGORY).await
}

/// Creates a test product with a custom category.
pub async fn create_categorized_product(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
    store: &str,
    category: &str,
) -> Result<product::Model> {
    catalog::create_product(db, name, price, store, category).await
}

/// Builds an active product model without touching the database.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn catalog_entry(id: i64, name: &str, price: f64, store: &str) -> product::Model {
    let stamp = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    product::Model {
        id,
        name: name.to_string(),
        name_lower: catalog::normalize_text(name),
        price,
        store: store.to_string(),
        category: TEST_CATEGORY.to_string(),
        is_deleted: false,
        created_at: stamp,
        updated_at: stamp,
    }
}

/// Builds a cart line for user 1 without touching the database.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn cart_line(
    product_id: i64,
    name: &str,
    price: f64,
    store: &str,
    quantity: i32,
) -> cart_item::Model {
    cart_item::Model {
        id: product_id,
        user_id: 1,
        product_id,
        name: name.to_string(),
        price,
        store: store.to_string(),
        category: TEST_CATEGORY.to_string(),
        quantity,
        savings: 0.0,
        added_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}
