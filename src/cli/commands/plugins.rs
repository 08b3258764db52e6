//! Plugins command - list registered lookup plugins

use super::CommandContext;
use anyhow::Result;

/// Print `name  description` for every registered lookup
pub fn list_plugins(ctx: &CommandContext) -> Result<i32> {
    let registry = ctx.registry();

    for name in registry.names() {
        if let Some(plugin) = registry.get(name) {
            println!("{:<20} {}", name, plugin.description());
        }
    }

    Ok(0)
}
