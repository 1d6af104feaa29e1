//! Core business logic - framework-agnostic catalog, cart, purchase and profile operations.
//!
//! Functions here take a database connection (or transaction) and return plain data;
//! formatting for Discord lives in the bot layer.

/// Account sign-up and lookup
pub mod account;
/// Per-user cart operations
pub mod cart;
/// Product catalog: upload, search, filtering and best-price views
pub mod catalog;
/// In-process change notifications with subscribe/unsubscribe lifecycle
pub mod feed;
/// Spending windows, history filters and lifetime stats
pub mod profile;
/// Checkout and purchase history
pub mod purchase;
/// Pure price-group and savings aggregation
pub mod savings;
