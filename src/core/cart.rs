//! Cart business logic - Handles each user's open cart.
//!
//! A cart holds at most one line per product; adding the same product again bumps the
//! quantity. Lines copy the product's name, price, store and category so the cart keeps
//! its meaning if the catalog entry is later removed. Pricing of the cart against the
//! live catalog is delegated to [`crate::core::savings`].

use crate::{
    core::{
        catalog,
        savings::{self, CartSummary},
    },
    entities::{CartItem, cart_item, product},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, instrument};

/// Retrieves a user's cart lines in the order they were first added.
pub async fn get_cart<C>(db: &C, user_id: i64) -> Result<Vec<cart_item::Model>>
where
    C: ConnectionTrait,
{
    CartItem::find()
        .filter(cart_item::Column::UserId.eq(user_id))
        .order_by_asc(cart_item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Total number of units in a user's cart (Σ quantity).
pub async fn get_cart_count(db: &DatabaseConnection, user_id: i64) -> Result<i64> {
    Ok(get_cart(db, user_id)
        .await?
        .iter()
        .map(|item| i64::from(item.quantity))
        .sum())
}

/// Adds one unit of a product to a user's cart.
///
/// Creates a new line with quantity 1, or increments the existing line for the same
/// product. The per-unit savings of the product against its name group are recorded
/// on the line. Runs in a transaction so concurrent adds never lose an increment.
///
/// # Errors
/// Returns [`Error::ProductNotFound`] if the product does not exist or was removed.
#[instrument(skip(db))]
pub async fn add_to_cart(
    db: &DatabaseConnection,
    user_id: i64,
    product_id: i64,
) -> Result<cart_item::Model> {
    let txn = db.begin().await?;

    let product = catalog::get_product_by_id(&txn, product_id)
        .await?
        .filter(|p| !p.is_deleted)
        .ok_or_else(|| Error::ProductNotFound {
            name: product_id.to_string(),
        })?;

    let group = catalog::get_products_by_name(&txn, &product.name).await?;
    let savings = savings::savings_per_unit(
        &savings::group_prices(&group),
        &product.name,
        product.price,
    );

    let existing = CartItem::find()
        .filter(cart_item::Column::UserId.eq(user_id))
        .filter(cart_item::Column::ProductId.eq(product_id))
        .one(&txn)
        .await?;

    let now = chrono::Utc::now();
    let line = if let Some(existing) = existing {
        let quantity = existing.quantity.saturating_add(1);
        let mut active: cart_item::ActiveModel = existing.into();
        active.quantity = Set(quantity);
        active.savings = Set(savings);
        active.added_at = Set(now);
        active.update(&txn).await?
    } else {
        cart_item::ActiveModel {
            user_id: Set(user_id),
            product_id: Set(product.id),
            name: Set(product.name.clone()),
            price: Set(product.price),
            store: Set(product.store.clone()),
            category: Set(product.category.clone()),
            quantity: Set(1),
            savings: Set(savings),
            added_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?
    };

    txn.commit().await?;
    debug!(cart_item_id = line.id, quantity = line.quantity, "Cart updated");
    Ok(line)
}

/// Adds the cheapest variant of a product name to the cart.
///
/// # Errors
/// Returns [`Error::ProductNotFound`] if no active product has this name.
pub async fn add_best_price_to_cart(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
) -> Result<(product::Model, cart_item::Model)> {
    let cheapest = catalog::get_products_by_name(db, name)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| Error::ProductNotFound {
            name: name.to_string(),
        })?;
    let line = add_to_cart(db, user_id, cheapest.id).await?;
    Ok((cheapest, line))
}

/// Removes a whole line from a user's cart.
///
/// # Errors
/// Returns [`Error::CartItemNotFound`] if the line does not exist in this user's cart.
#[instrument(skip(db))]
pub async fn remove_from_cart(
    db: &DatabaseConnection,
    user_id: i64,
    cart_item_id: i64,
) -> Result<cart_item::Model> {
    let line = CartItem::find_by_id(cart_item_id)
        .filter(cart_item::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::CartItemNotFound { id: cart_item_id })?;

    CartItem::delete_by_id(line.id).exec(db).await?;
    Ok(line)
}

/// Deletes every line of a user's cart, returning how many were removed.
pub async fn clear_cart<C>(db: &C, user_id: i64) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = CartItem::delete_many()
        .filter(cart_item::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Prices a user's cart against the live catalog.
pub async fn summarize_cart(db: &DatabaseConnection, user_id: i64) -> Result<CartSummary> {
    let cart = get_cart(db, user_id).await?;
    let products = catalog::get_all_active_products(db).await?;
    Ok(savings::summarize(&cart, &products))
}
