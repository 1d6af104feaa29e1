/// Database configuration and connection management
pub mod database;

/// Catalog seed and category configuration loading from config.toml
pub mod catalog;
