//! CLI module for Cloudglue
//!
//! Argument parsing and subcommand dispatch for the `cloudglue` binary.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cloudglue - dynamic inventory and EC2 lookups for Ansible-style hosts
#[derive(Parser, Debug, Clone)]
#[command(name = "cloudglue")]
#[command(author = "Cloudglue Contributors")]
#[command(version)]
#[command(about = "Dynamic inventory and EC2 lookup plugins", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true, env = "CLOUDGLUE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Dynamic inventory (--list / --host)
    Inventory(commands::inventory::InventoryArgs),

    /// Run a lookup plugin and print its values as JSON
    Lookup(commands::lookup::LookupArgs),

    /// List available lookup plugins
    Plugins,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Get the effective verbosity level (0-3)
    pub fn verbosity(&self) -> u8 {
        self.verbose.min(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["cloudglue", "inventory", "--list"]).unwrap();
        assert!(matches!(cli.command, Commands::Inventory(_)));
    }

    #[test]
    fn test_verbosity() {
        let cli = Cli::try_parse_from(["cloudglue", "-vvvv", "plugins"]).unwrap();
        assert_eq!(cli.verbosity(), 3);
    }

    #[test]
    fn test_lookup_parsing() {
        let cli = Cli::try_parse_from([
            "cloudglue",
            "lookup",
            "aws_ec2_extended",
            "us-east-1",
            "state=stopped",
        ])
        .unwrap();

        let Commands::Lookup(args) = cli.command else {
            panic!("expected lookup command");
        };
        assert_eq!(args.plugin, "aws_ec2_extended");
        assert_eq!(args.args, vec!["us-east-1", "state=stopped"]);
    }

    #[test]
    fn test_global_flags_after_lookup_terms() {
        let cli = Cli::try_parse_from(["cloudglue", "lookup", "aws_ec2", "us-east-1", "-v"]).unwrap();
        assert_eq!(cli.verbosity(), 1);

        let Commands::Lookup(args) = cli.command else {
            panic!("expected lookup command");
        };
        assert_eq!(args.args, vec!["us-east-1"]);
    }
}
