//! Cloudglue - dynamic inventory and EC2 lookups
//!
//! This is the main entry point for the Cloudglue CLI. JSON results go to
//! stdout, logs go to stderr.

mod cli;

use anyhow::Result;
use cli::commands::{CommandContext, Runnable};
use cli::{Cli, Commands};
use cloudglue::config::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let config = Config::load(cli.config.as_deref())?;

    init_logging(cli.verbosity(), &config.logging.level);

    let ctx = CommandContext::new(config);

    let exit_code = match &cli.command {
        Commands::Inventory(args) => args.run(&ctx)?,
        Commands::Lookup(args) => args.run(&ctx)?,
        Commands::Plugins => cli::commands::plugins::list_plugins(&ctx)?,
    };

    std::process::exit(exit_code);
}

/// Initialize logging based on verbosity level
///
/// `RUST_LOG` wins, then `-v` flags, then the configured level.
fn init_logging(verbosity: u8, configured: &str) {
    let filter = match verbosity {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbosity >= 3),
        )
        .with(env_filter)
        .init();
}
