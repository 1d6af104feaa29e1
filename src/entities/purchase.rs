//! Purchase entity - An immutable snapshot of a checked-out cart.
//!
//! The purchased lines live in `purchase_items`; the totals are stored here so
//! history views never need to recompute them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    /// Unique identifier for the purchase
    #[sea_orm(primary_key)]
    pub id: i64,
    /// User who closed the purchase
    pub user_id: i64,
    /// When the purchase was closed
    pub date: DateTimeUtc,
    /// Sum of price × quantity over all lines
    pub total_spent: f64,
    /// Sum of per-unit savings × quantity over all lines
    pub total_savings: f64,
}

/// Defines relationships between Purchase and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each purchase belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// One purchase has many lines
    #[sea_orm(has_many = "super::purchase_item::Entity")]
    Items,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::purchase_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
