//! Error types for Cloudglue.
//!
//! Each component owns a focused error enum; this module ties them together
//! into the crate-level [`Error`] used at API boundaries.

use thiserror::Error;

pub use crate::config::ConfigError;
pub use crate::inventory::InventoryError;
pub use crate::lookup::LookupError;

/// Result type alias for Cloudglue operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Cloudglue.
#[derive(Error, Debug)]
pub enum Error {
    /// Inventory fetch or shaping failed.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// A lookup plugin failed.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
