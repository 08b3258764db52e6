//! Lookup Plugin System for Cloudglue
//!
//! Lookup plugins retrieve data from external sources and hand it back to the
//! automation host as a list of strings, the same contract as Ansible's
//! lookup plugins.
//!
//! # Available Plugins
//!
//! - [`Ec2Lookup`] (`aws_ec2`) - List instance IDs in a region
//! - [`Ec2StateLookup`] (`aws_ec2_extended`) - List instance IDs filtered by state
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use cloudglue::lookup::{LookupRegistry, LookupContext};
//!
//! let registry = LookupRegistry::with_builtins();
//! let context = LookupContext::default();
//!
//! // Every instance in the region
//! let ids = registry.lookup("aws_ec2", &["us-east-1"], &context)?;
//!
//! // Only stopped instances
//! let stopped = registry.lookup("aws_ec2_extended", &["us-east-1", "state=stopped"], &context)?;
//! ```

#[cfg(feature = "aws")]
pub mod aws;
pub mod ec2;

#[cfg(feature = "aws")]
pub use aws::SdkInstanceSource;
pub use ec2::{
    flatten_instance_ids, DescribeInstancesRequest, Ec2Lookup, Ec2StateLookup, Instance,
    InstanceFilter, InstanceSource, InstanceState, Reservation,
};

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during lookup operations
#[derive(Error, Debug)]
pub enum LookupError {
    /// Lookup plugin not found
    #[error("Lookup plugin not found: {0}")]
    NotFound(String),

    /// Invalid arguments provided to lookup
    #[error("Invalid lookup arguments: {0}")]
    InvalidArguments(String),

    /// Missing required argument
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    /// The provider response lacks a field the lookup needs
    #[error("Provider response is missing field: {0}")]
    MissingField(String),

    /// The provider API call failed
    #[error("Provider error: {0}")]
    Provider(String),

    /// The runtime driving the provider call could not be started
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Generic lookup error
    #[error("{0}")]
    Other(String),
}

/// Result type for lookup operations
pub type LookupResult<T> = Result<T, LookupError>;

/// Context for lookup plugin execution
#[derive(Debug, Clone)]
pub struct LookupContext {
    /// Timeout for network operations in seconds
    pub timeout_secs: u64,

    /// Whether to fail on errors or return default values
    pub fail_on_error: bool,

    /// Default value to return when lookup fails and fail_on_error is false
    pub default_value: Option<String>,
}

impl Default for LookupContext {
    fn default() -> Self {
        Self::new()
    }
}

impl LookupContext {
    /// Create a new lookup context
    pub fn new() -> Self {
        Self {
            timeout_secs: 30,
            fail_on_error: true,
            default_value: None,
        }
    }

    /// Set timeout for network operations
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set whether to fail on errors
    pub fn with_fail_on_error(mut self, fail: bool) -> Self {
        self.fail_on_error = fail;
        self
    }

    /// Set default value for failed lookups
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default_value = Some(default.into());
        self
    }
}

/// Trait that all lookup plugins must implement
pub trait Lookup: Send + Sync {
    /// Returns the name of the lookup plugin
    fn name(&self) -> &'static str;

    /// Returns a description of what this lookup does
    fn description(&self) -> &'static str;

    /// Execute the lookup with the given arguments
    ///
    /// # Arguments
    ///
    /// * `args` - Positional terms followed or interleaved with `key=value` options
    /// * `context` - Lookup execution context
    ///
    /// # Returns
    ///
    /// A vector of strings, one for each resolved value, in source order.
    fn lookup(&self, args: &[&str], context: &LookupContext) -> LookupResult<Vec<String>>;

    /// Parse key=value arguments from the args list
    fn parse_options(&self, args: &[&str]) -> HashMap<String, String> {
        let mut options = HashMap::new();
        for arg in args {
            if let Some((key, value)) = arg.split_once('=') {
                options.insert(key.to_string(), value.to_string());
            }
        }
        options
    }

    /// Positional terms, i.e. every argument that is not a `key=value` option
    fn terms<'a>(&self, args: &[&'a str]) -> Vec<&'a str> {
        args.iter().copied().filter(|arg| !arg.contains('=')).collect()
    }
}

/// Registry for looking up plugins by name
pub struct LookupRegistry {
    plugins: HashMap<String, Arc<dyn Lookup>>,
}

impl LookupRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            plugins: HashMap::new(),
        }
    }

    /// Create a registry with all built-in lookup plugins
    ///
    /// The EC2 lookups are only available with the `aws` feature.
    pub fn with_builtins() -> Self {
        #[cfg(feature = "aws")]
        {
            Self::with_aws(&crate::config::AwsConfig::default())
        }
        #[cfg(not(feature = "aws"))]
        {
            Self::new()
        }
    }

    /// Create a registry whose EC2 lookups use the given AWS settings
    #[cfg(feature = "aws")]
    pub fn with_aws(config: &crate::config::AwsConfig) -> Self {
        let source: Arc<dyn InstanceSource> = Arc::new(SdkInstanceSource::from_config(config));
        Self::with_instance_source(source)
    }

    /// Create a registry whose EC2 lookups query the given source
    pub fn with_instance_source(source: Arc<dyn InstanceSource>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(Ec2Lookup::new(Arc::clone(&source))));
        registry.register(Arc::new(Ec2StateLookup::new(source)));
        registry
    }

    /// Register a lookup plugin
    pub fn register(&mut self, plugin: Arc<dyn Lookup>) {
        self.plugins.insert(plugin.name().to_string(), plugin);
    }

    /// Get a lookup plugin by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Lookup>> {
        self.plugins.get(name).cloned()
    }

    /// Check if a lookup plugin exists
    pub fn contains(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// Get all registered plugin names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.plugins.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Execute a lookup by plugin name
    ///
    /// When `context.fail_on_error` is false a failing lookup yields the
    /// context default value (or an empty string) instead of an error.
    pub fn lookup(
        &self,
        name: &str,
        args: &[&str],
        context: &LookupContext,
    ) -> LookupResult<Vec<String>> {
        let plugin = self
            .get(name)
            .ok_or_else(|| LookupError::NotFound(name.to_string()))?;

        match plugin.lookup(args, context) {
            Ok(result) => Ok(result),
            Err(e) if !context.fail_on_error => {
                tracing::warn!(plugin = name, error = %e, "lookup failed, using default value");
                Ok(vec![context.default_value.clone().unwrap_or_default()])
            }
            Err(e) => Err(e),
        }
    }
}

impl Default for LookupRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Convenient re-exports for lookup plugin development and usage.
pub mod prelude {
    pub use super::Ec2Lookup;
    pub use super::Ec2StateLookup;
    pub use super::InstanceSource;
    pub use super::Lookup;
    pub use super::LookupContext;
    pub use super::LookupError;
    pub use super::LookupRegistry;
    pub use super::LookupResult;
}
