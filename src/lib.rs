//! # Cloudglue - Inventory and Lookup Glue for Automation Hosts
//!
//! Cloudglue bundles three small, stateless integrations for Ansible-style
//! automation hosts:
//!
//! - **Inventory**: fetch a host list from an HTTP API and emit it as a
//!   dynamic inventory document (`{"all": {"hosts": [...]}}`)
//! - **`aws_ec2` lookup**: list EC2 instance IDs in a region
//! - **`aws_ec2_extended` lookup**: the same, filtered server-side by
//!   instance state (default `running`)
//!
//! Every call performs exactly one remote request and returns results in
//! the order the remote API produced them. Errors propagate; nothing is
//! retried or cached.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use cloudglue::prelude::*;
//!
//! let document = HttpInventorySource::new("https://api.example.com/hosts")?.inventory()?;
//!
//! let registry = LookupRegistry::with_builtins();
//! let running = registry.lookup("aws_ec2_extended", &["us-east-1"], &LookupContext::default())?;
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

/// Convenient re-exports of commonly used types and traits.
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::inventory::{build_inventory, HostRecord, HttpInventorySource, InventoryDocument};
    pub use crate::lookup::{Lookup, LookupContext, LookupRegistry, LookupResult};
}

pub mod config;
pub mod error;
pub mod inventory;
pub mod lookup;

pub use error::{Error, Result};
