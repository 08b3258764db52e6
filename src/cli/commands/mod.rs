//! Subcommands module for Cloudglue CLI
//!
//! This module contains all the subcommand implementations.

pub mod inventory;
pub mod lookup;
pub mod plugins;

use anyhow::Result;
use cloudglue::config::Config;
use cloudglue::lookup::{LookupContext, LookupRegistry};

/// Common context shared between commands
pub struct CommandContext {
    /// Configuration
    pub config: Config,
}

impl CommandContext {
    /// Create a new command context from loaded configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Lookup registry wired to the configured providers
    pub fn registry(&self) -> LookupRegistry {
        #[cfg(feature = "aws")]
        {
            LookupRegistry::with_aws(&self.config.aws)
        }
        #[cfg(not(feature = "aws"))]
        {
            LookupRegistry::with_builtins()
        }
    }

    /// Lookup context carrying the configured timeout
    pub fn lookup_context(&self) -> LookupContext {
        LookupContext::new().with_timeout(self.config.aws.timeout)
    }
}

/// Trait for executable commands
pub trait Runnable {
    /// Execute the command, returning the process exit code
    fn run(&self, ctx: &CommandContext) -> Result<i32>;
}
