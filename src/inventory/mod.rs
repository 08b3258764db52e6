//! Dynamic inventory for Cloudglue
//!
//! Fetches a host list from an HTTP API and reshapes it into the JSON
//! document Ansible expects from a dynamic inventory script:
//!
//! ```json
//! {"all": {"hosts": ["web-01", "web-02"]}}
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use cloudglue::inventory::HttpInventorySource;
//!
//! let source = HttpInventorySource::new("https://api.example.com/hosts")?;
//! let document = source.inventory()?;
//! println!("{}", serde_json::to_string(&document)?);
//! ```

pub mod http;

pub use http::HttpInventorySource;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while building the inventory
#[derive(Error, Debug)]
pub enum InventoryError {
    /// The configured URL is not valid
    #[error("Invalid inventory URL '{url}': {message}")]
    InvalidUrl {
        /// Offending URL
        url: String,
        /// Parser message
        message: String,
    },

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// The API answered with a non-success status
    #[error("Inventory API '{url}' returned HTTP {status}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// The body is not a JSON array of host objects
    #[error("Failed to parse inventory response: {0}")]
    Parse(String),
}

/// Result type for inventory operations
pub type InventoryResult<T> = Result<T, InventoryError>;

/// One host object as returned by the inventory API.
///
/// Only `hostname` is required; any other fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRecord {
    /// Name Ansible will use for the host
    pub hostname: String,
}

impl HostRecord {
    /// Create a new host record
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
        }
    }
}

/// The `all` group of a dynamic inventory document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllGroup {
    /// Host names in API order
    pub hosts: Vec<String>,
}

/// Top-level dynamic inventory document: `{"all": {"hosts": [...]}}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryDocument {
    /// The implicit group every host belongs to
    pub all: AllGroup,
}

impl InventoryDocument {
    /// Number of hosts in the document
    pub fn host_count(&self) -> usize {
        self.all.hosts.len()
    }

    /// Host names in API order
    pub fn hosts(&self) -> &[String] {
        &self.all.hosts
    }
}

/// Map host records to the inventory document, preserving order.
///
/// No sorting or deduplication is performed.
pub fn build_inventory(hosts: &[HostRecord]) -> InventoryDocument {
    InventoryDocument {
        all: AllGroup {
            hosts: hosts.iter().map(|h| h.hostname.clone()).collect(),
        },
    }
}

/// Parse a JSON array of host objects
pub fn parse_hosts(body: &str) -> InventoryResult<Vec<HostRecord>> {
    serde_json::from_str(body).map_err(|e| InventoryError::Parse(e.to_string()))
}
