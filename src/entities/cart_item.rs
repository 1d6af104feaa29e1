//! Cart item entity - One line of a user's open cart.
//!
//! The product fields are copied when the line is created so the cart keeps showing
//! what the user picked even if the catalog entry is later removed.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cart item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cart_items")]
pub struct Model {
    /// Unique identifier for the cart line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the cart
    pub user_id: i64,
    /// Product this line was created from
    pub product_id: i64,
    /// Product name at the time it was added
    pub name: String,
    /// Unit price at the time it was added
    pub price: f64,
    /// Store the product was picked from
    pub store: String,
    /// Product category
    pub category: String,
    /// Number of units; incremented on repeated adds
    pub quantity: i32,
    /// Per-unit savings against the most expensive variant when added
    pub savings: f64,
    /// When the line was created or last incremented
    pub added_at: DateTimeUtc,
}

/// Defines relationships between `CartItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each cart line belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// Each cart line points at one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
