//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Account commands
pub mod account;

/// Cart and checkout commands
pub mod cart;

/// Catalog browsing and upload commands
pub mod catalog;

/// General utility commands
pub mod general;

/// Profile and history commands
pub mod profile;

// Export commands
pub use account::*;
pub use cart::*;
pub use catalog::*;
pub use general::*;
pub use profile::*;
