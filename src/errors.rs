//! Unified error type for `PriceBuddy`.
//!
//! Every fallible operation in the crate returns [`Result`]. Expected user-facing
//! failures (empty cart, unknown product, missing sign-up) have dedicated variants so
//! the bot layer can turn them into friendly replies; everything else is logged.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: f64 },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Product not found: {name}")]
    ProductNotFound { name: String },

    #[error("Cart item not found: {id}")]
    CartItemNotFound { id: i64 },

    #[error("The cart is empty")]
    EmptyCart,

    #[error("User has not signed up")]
    NotSignedUp,

    #[error("User is already registered")]
    AlreadyRegistered,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
