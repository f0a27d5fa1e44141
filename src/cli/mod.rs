//! Command-line interface module.

mod args;
pub mod list;
pub mod serve;

pub use args::{Cli, Commands, LoadArgs};

use anyhow::{Context, Result};

use crate::config::KilnConfig;
use crate::site::{self, Site, Source};

/// Run one CLI invocation.
pub fn run(cli: &Cli) -> Result<()> {
    let config = KilnConfig::load(cli)?;

    match &cli.command {
        Commands::List { json, pretty, .. } => list::list(&config, *json, *pretty),
        Commands::Serve { .. } => serve::serve(&config),
    }
}

/// Compile the configured source into a site.
fn load_site(config: &KilnConfig) -> Result<Site> {
    let source = Source::Dir(config.load.source.clone());
    site::load(source, config.load.load_options())
        .with_context(|| format!("Failed to load {}", config.load.source.display()))
}
