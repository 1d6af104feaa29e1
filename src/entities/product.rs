//! Product entity - One price observation of an item at one store.
//!
//! Several products may share a name: they are the same item sold by different stores.
//! `name_lower` holds the normalized name used to group those variants and to search.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the product (e.g., "Leche Entera 1L")
    pub name: String,
    /// Lower-cased, accent-folded name used for grouping and search
    pub name_lower: String,
    /// Unit price at this store
    pub price: f64,
    /// Store selling the product at this price
    pub store: String,
    /// Shelf category (e.g., "Lácteos", "Limpieza")
    pub category: String,
    /// Soft delete flag - if true, product is hidden from the catalog
    pub is_deleted: bool,
    /// When the product was uploaded
    pub created_at: DateTime,
    /// When the product was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product can sit in many carts
    #[sea_orm(has_many = "super::cart_item::Entity")]
    CartItems,
}

impl Related<super::cart_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
