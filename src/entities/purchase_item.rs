//! Purchase item entity - One line of a closed purchase.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_items")]
pub struct Model {
    /// Unique identifier for the line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Purchase this line belongs to
    pub purchase_id: i64,
    /// Product the line was bought from
    pub product_id: i64,
    /// Product name
    pub name: String,
    /// Unit price paid
    pub price: f64,
    /// Store the product was bought at
    pub store: String,
    /// Product category
    pub category: String,
    /// Number of units bought
    pub quantity: i32,
    /// Per-unit savings computed at checkout
    pub savings: f64,
}

/// Defines relationships between `PurchaseItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one purchase
    #[sea_orm(
        belongs_to = "super::purchase::Entity",
        from = "Column::PurchaseId",
        to = "super::purchase::Column::Id"
    )]
    Purchase,
}

impl Related<super::purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchase.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
