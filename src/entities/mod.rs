//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod cart_item;
pub mod product;
pub mod purchase;
pub mod purchase_item;
pub mod user;

// Re-export specific types to avoid conflicts
pub use cart_item::{Column as CartItemColumn, Entity as CartItem, Model as CartItemModel};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use purchase::{Column as PurchaseColumn, Entity as Purchase, Model as PurchaseModel};
pub use purchase_item::{
    Column as PurchaseItemColumn, Entity as PurchaseItem, Model as PurchaseItemModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
