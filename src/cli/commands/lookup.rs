//! Lookup command - run a lookup plugin from the shell

use super::{CommandContext, Runnable};
use anyhow::{Context, Result};
use clap::Parser;

/// Arguments for the lookup command
#[derive(Parser, Debug, Clone)]
pub struct LookupArgs {
    /// Lookup plugin name (e.g. aws_ec2, aws_ec2_extended)
    pub plugin: String,

    /// Terms and key=value options passed to the plugin
    pub args: Vec<String>,
}

impl Runnable for LookupArgs {
    fn run(&self, ctx: &CommandContext) -> Result<i32> {
        let registry = ctx.registry();
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();

        let values = registry
            .lookup(&self.plugin, &args, &ctx.lookup_context())
            .with_context(|| format!("Lookup '{}' failed", self.plugin))?;

        println!("{}", serde_json::to_string(&values)?);
        Ok(0)
    }
}
