//! Purchase business logic - checkout and purchase history.
//!
//! Closing a purchase is a single database transaction: the purchase row, its lines,
//! the cart deletion and the user's stats update either all commit or none do. A failed
//! checkout therefore never leaves a cleared cart without a recorded purchase, or a
//! recorded purchase with the cart still full.

use crate::{
    core::{cart, catalog, profile, savings},
    entities::{Purchase, PurchaseItem, User, purchase, purchase_item, user},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// A purchase together with its lines.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseRecord {
    /// The purchase header with its totals
    pub purchase: purchase::Model,
    /// The purchased lines
    pub items: Vec<purchase_item::Model>,
}

impl PurchaseRecord {
    /// Number of units bought in this purchase.
    #[must_use]
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i64::from(i.quantity)).sum()
    }
}

/// Snapshots a user's cart into a new purchase and empties the cart.
///
/// Totals are computed against the live catalog at checkout time. The user's
/// `total_spent` grows by the purchase total, `total_purchases` grows by exactly one,
/// and `favorite_category` is recomputed over the purchase history still on record,
/// so after [`reset_purchase_history`] it only reflects purchases made since.
///
/// # Errors
/// - [`Error::NotSignedUp`] if the user does not exist
/// - [`Error::EmptyCart`] if there is nothing to check out; nothing is written
/// - any database error, in which case the transaction is rolled back
#[instrument(skip(db))]
pub async fn close_purchase(db: &DatabaseConnection, user_id: i64) -> Result<PurchaseRecord> {
    let txn = db.begin().await?;

    let user = User::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotSignedUp)?;

    let cart_items = cart::get_cart(&txn, user_id).await?;
    if cart_items.is_empty() {
        return Err(Error::EmptyCart);
    }

    let products = catalog::get_all_active_products(&txn).await?;
    let summary = savings::summarize(&cart_items, &products);

    let purchase = purchase::ActiveModel {
        user_id: Set(user_id),
        date: Set(chrono::Utc::now()),
        total_spent: Set(summary.total_spent),
        total_savings: Set(summary.total_savings),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut items = Vec::with_capacity(summary.lines.len());
    for line in &summary.lines {
        let item = purchase_item::ActiveModel {
            purchase_id: Set(purchase.id),
            product_id: Set(line.item.product_id),
            name: Set(line.item.name.clone()),
            price: Set(line.item.price),
            store: Set(line.item.store.clone()),
            category: Set(line.item.category.clone()),
            quantity: Set(line.item.quantity),
            savings: Set(line.savings_per_unit),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        items.push(item);
    }

    cart::clear_cart(&txn, user_id).await?;

    let history_items = PurchaseItem::find()
        .inner_join(Purchase)
        .filter(purchase::Column::UserId.eq(user_id))
        .all(&txn)
        .await?;

    let total_spent = user.total_spent + summary.total_spent;
    let total_purchases = user.total_purchases + 1;
    let mut stats: user::ActiveModel = user.into();
    stats.total_spent = Set(total_spent);
    stats.total_purchases = Set(total_purchases);
    stats.favorite_category = Set(profile::favorite_category(&history_items));
    stats.update(&txn).await?;

    txn.commit().await?;

    info!(
        purchase_id = purchase.id,
        total_spent = purchase.total_spent,
        total_savings = purchase.total_savings,
        "Purchase closed"
    );
    Ok(PurchaseRecord { purchase, items })
}

/// Retrieves a user's purchases with their lines, newest first.
pub async fn get_purchase_history(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<PurchaseRecord>> {
    let rows = Purchase::find()
        .filter(purchase::Column::UserId.eq(user_id))
        .order_by_desc(purchase::Column::Date)
        .order_by_desc(purchase::Column::Id)
        .find_with_related(PurchaseItem)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(purchase, items)| PurchaseRecord { purchase, items })
        .collect())
}

/// Deletes every purchase of a user, returning how many were removed.
///
/// Lifetime stats on the user are left untouched, including `favorite_category`.
/// The favorite stays as it was until the next [`close_purchase`], which recomputes it
/// from the purchases made after the reset.
#[instrument(skip(db))]
pub async fn reset_purchase_history(db: &DatabaseConnection, user_id: i64) -> Result<u64> {
    let txn = db.begin().await?;

    let purchase_ids: Vec<i64> = Purchase::find()
        .select_only()
        .column(purchase::Column::Id)
        .filter(purchase::Column::UserId.eq(user_id))
        .into_tuple()
        .all(&txn)
        .await?;

    PurchaseItem::delete_many()
        .filter(purchase_item::Column::PurchaseId.is_in(purchase_ids))
        .exec(&txn)
        .await?;
    let deleted = Purchase::delete_many()
        .filter(purchase::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;
    info!(deleted = deleted.rows_affected, "Purchase history reset");
    Ok(deleted.rows_affected)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::account;
    use crate::test_utils::*;
    use sea_orm::ConnectionTrait;

    #[tokio::test]
    async fn test_close_purchase_empty_cart_changes_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "user1").await?;

        let result = close_purchase(&db, user.id).await;
        assert!(matches!(result, Err(Error::EmptyCart)));

        assert!(get_purchase_history(&db, user.id).await?.is_empty());
        let after = account::get_user_by_id(&db, user.id).await?.unwrap();
        assert_eq!(after.total_spent, 0.0);
        assert_eq!(after.total_purchases, 0);
        assert!(after.favorite_category.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_close_purchase_unknown_user() -> Result<()> {
        let db = setup_test_db().await?;
        let result = close_purchase(&db, 77).await;
        assert!(matches!(result, Err(Error::NotSignedUp)));
        Ok(())
    }

    #[tokio::test]
    async fn test_close_purchase_records_and_clears() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "user1").await?;
        let milk = create_test_product(&db, "Milk", 100.0, "A").await?;
        create_test_product(&db, "Milk", 150.0, "B").await?;
        cart::add_to_cart(&db, user.id, milk.id).await?;
        cart::add_to_cart(&db, user.id, milk.id).await?;

        let record = close_purchase(&db, user.id).await?;
        assert_eq!(record.purchase.total_spent, 200.0);
        assert_eq!(record.purchase.total_savings, 100.0);
        assert_eq!(record.items.len(), 1);
        assert_eq!(record.items[0].quantity, 2);
        assert_eq!(record.items[0].savings, 50.0);
        assert_eq!(record.item_count(), 2);

        assert!(cart::get_cart(&db, user.id).await?.is_empty());

        let history = get_purchase_history(&db, user.id).await?;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].purchase.id, record.purchase.id);
        assert_eq!(history[0].items, record.items);

        let stats = account::get_user_by_id(&db, user.id).await?.unwrap();
        assert_eq!(stats.total_spent, 200.0);
        assert_eq!(stats.total_purchases, 1);
        assert_eq!(stats.favorite_category.as_deref(), Some(TEST_CATEGORY));
        Ok(())
    }

    #[tokio::test]
    async fn test_stats_accumulate_across_purchases() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "user1").await?;
        let soap = create_categorized_product(&db, "Soap", 300.0, "A", "Limpieza").await?;
        let juice = create_categorized_product(&db, "Juice", 500.0, "A", "Bebidas").await?;

        cart::add_to_cart(&db, user.id, juice.id).await?;
        let first = close_purchase(&db, user.id).await?;

        for _ in 0..3 {
            cart::add_to_cart(&db, user.id, soap.id).await?;
        }
        let second = close_purchase(&db, user.id).await?;

        let stats = account::get_user_by_id(&db, user.id).await?.unwrap();
        assert_eq!(
            stats.total_spent,
            first.purchase.total_spent + second.purchase.total_spent
        );
        assert_eq!(stats.total_spent, 1400.0);
        assert_eq!(stats.total_purchases, 2);
        assert_eq!(stats.favorite_category.as_deref(), Some("Limpieza"));

        let history = get_purchase_history(&db, user.id).await?;
        assert_eq!(history.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_close_purchase_only_touches_own_cart() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;
        let bob = create_test_user(&db, "bob").await?;
        let milk = create_test_product(&db, "Milk", 100.0, "A").await?;
        cart::add_to_cart(&db, alice.id, milk.id).await?;
        cart::add_to_cart(&db, bob.id, milk.id).await?;

        close_purchase(&db, alice.id).await?;

        assert!(cart::get_cart(&db, alice.id).await?.is_empty());
        assert_eq!(cart::get_cart(&db, bob.id).await?.len(), 1);
        assert!(get_purchase_history(&db, bob.id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_close_purchase_rolls_back_on_failure() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "user1").await?;
        let milk = create_test_product(&db, "Milk", 100.0, "A").await?;
        cart::add_to_cart(&db, user.id, milk.id).await?;

        // Line inserts fail after the purchase header is already written.
        db.execute_unprepared("DROP TABLE purchase_items").await?;

        let result = close_purchase(&db, user.id).await;
        assert!(matches!(result, Err(Error::Database(_))));

        assert_eq!(cart::get_cart(&db, user.id).await?.len(), 1);
        assert_eq!(Purchase::find().count(&db).await?, 0);
        let stats = account::get_user_by_id(&db, user.id).await?.unwrap();
        assert_eq!(stats.total_spent, 0.0);
        assert_eq!(stats.total_purchases, 0);
        assert!(stats.favorite_category.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_purchase_survives_product_removal() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "user1").await?;
        let bread = create_test_product(&db, "Bread", 450.0, "A").await?;
        cart::add_to_cart(&db, user.id, bread.id).await?;
        catalog::delete_product(&db, bread.id).await?;

        let record = close_purchase(&db, user.id).await?;
        assert_eq!(record.purchase.total_spent, 450.0);
        assert_eq!(record.purchase.total_savings, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_reset_purchase_history_keeps_stats() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "user1").await?;
        let milk = create_test_product(&db, "Milk", 100.0, "A").await?;
        cart::add_to_cart(&db, user.id, milk.id).await?;
        close_purchase(&db, user.id).await?;
        cart::add_to_cart(&db, user.id, milk.id).await?;
        close_purchase(&db, user.id).await?;

        assert_eq!(reset_purchase_history(&db, user.id).await?, 2);
        assert!(get_purchase_history(&db, user.id).await?.is_empty());

        let stats = account::get_user_by_id(&db, user.id).await?.unwrap();
        assert_eq!(stats.total_purchases, 2);
        assert_eq!(stats.total_spent, 200.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_favorite_category_after_reset() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "user1").await?;
        let soap = create_categorized_product(&db, "Soap", 300.0, "A", "Limpieza").await?;
        let juice = create_categorized_product(&db, "Juice", 500.0, "A", "Bebidas").await?;

        for _ in 0..3 {
            cart::add_to_cart(&db, user.id, soap.id).await?;
        }
        close_purchase(&db, user.id).await?;
        reset_purchase_history(&db, user.id).await?;

        let stats = account::get_user_by_id(&db, user.id).await?.unwrap();
        assert_eq!(stats.favorite_category.as_deref(), Some("Limpieza"));

        cart::add_to_cart(&db, user.id, juice.id).await?;
        close_purchase(&db, user.id).await?;

        let stats = account::get_user_by_id(&db, user.id).await?.unwrap();
        assert_eq!(stats.favorite_category.as_deref(), Some("Bebidas"));
        assert_eq!(stats.total_purchases, 2);
        Ok(())
    }
}
