//! User entity - A signed-up shopper and their lifetime statistics.
//!
//! Users are keyed by their Discord identity. The stats columns are accumulated
//! when a purchase is closed and are never decremented.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user ID this account belongs to
    #[sea_orm(unique)]
    pub discord_id: String,
    /// Optional contact email given at sign-up
    pub email: Option<String>,
    /// Sum of `total_spent` over every closed purchase
    pub total_spent: f64,
    /// Number of closed purchases (one per checkout)
    pub total_purchases: i64,
    /// Category with the most purchased units, if any purchase exists
    pub favorite_category: Option<String>,
    /// When the user signed up
    pub created_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user has many cart lines
    #[sea_orm(has_many = "super::cart_item::Entity")]
    CartItems,
    /// One user has many purchases
    #[sea_orm(has_many = "super::purchase::Entity")]
    Purchases,
}

impl Related<super::cart_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartItems.def()
    }
}

impl Related<super::purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
