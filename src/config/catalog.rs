//! Catalog configuration loading from config.toml
//!
//! The `[[products]]` entries seed the catalog on first run, and the optional
//! `categories` list drives the category suggestions offered by `/upload`.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Categories offered when `config.toml` does not list any.
pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "Bebidas",
    "Cocina",
    "Congelados",
    "Cuidado Personal",
    "Lácteos",
    "Limpieza",
    "Panadería",
    "Snacks",
];

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Shelf categories shown as suggestions
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    /// Products inserted when the catalog is empty
    #[serde(default)]
    pub products: Vec<ProductSeed>,
}

/// One catalog entry to seed
#[derive(Debug, Deserialize, Clone)]
pub struct ProductSeed {
    /// Product name
    pub name: String,
    /// Unit price
    pub price: f64,
    /// Store selling it
    pub store: String,
    /// Shelf category
    pub category: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            products: Vec::new(),
        }
    }
}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(ToString::to_string).collect()
}

/// Loads catalog configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required product fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads catalog configuration from the default location (./config.toml)
///
/// A missing file is not an error: the bot then starts with an empty catalog
/// and the default categories.
pub fn load_default_config() -> Result<Config> {
    let path = Path::new("config.toml");
    if !path.exists() {
        tracing::warn!("config.toml not found, starting without catalog seed");
        return Ok(Config::default());
    }
    load_config(path)
}
