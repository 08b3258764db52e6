//! Inventory command - Ansible dynamic inventory protocol
//!
//! `--list` prints the full inventory document; `--host <name>` prints the
//! host's variables, which this source never carries.

use super::{CommandContext, Runnable};
use anyhow::{Context, Result};
use clap::Parser;
use cloudglue::inventory::HttpInventorySource;

/// Arguments for the inventory command
#[derive(Parser, Debug, Clone)]
#[command(group(clap::ArgGroup::new("mode").required(true).args(["list", "host"])))]
pub struct InventoryArgs {
    /// Print the whole inventory
    #[arg(long)]
    pub list: bool,

    /// Print variables for a single host
    #[arg(long, value_name = "HOSTNAME")]
    pub host: Option<String>,

    /// Override the inventory API URL
    #[arg(long)]
    pub url: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl InventoryArgs {
    fn render(&self, value: &impl serde::Serialize) -> Result<String> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(rendered)
    }
}

impl Runnable for InventoryArgs {
    fn run(&self, ctx: &CommandContext) -> Result<i32> {
        if let Some(ref host) = self.host {
            tracing::debug!(host = %host, "no host variables available");
            println!("{}", self.render(&serde_json::json!({}))?);
            return Ok(0);
        }

        let mut config = ctx.config.inventory.clone();
        if let Some(ref url) = self.url {
            config.url = url.clone();
        }

        let source = HttpInventorySource::from_config(&config)?;
        let document = source
            .inventory()
            .with_context(|| format!("Failed to fetch inventory from '{}'", source.url()))?;

        println!("{}", self.render(&document)?);
        Ok(0)
    }
}
