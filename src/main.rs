//! tagtree CLI entry point

use anyhow::Context;
use clap::Parser;
use tagtree::cli::{Cli, Commands};
use tagtree::core::config::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Initialize logging (stdout is reserved for command output)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_env("TAGTREE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load().context("failed to load config")?,
    };

    match cli.command {
        Commands::Providers(args) => tagtree::cli::providers::run(args)?,
        Commands::Stats(args) => tagtree::cli::stats::run(args, &config)?,
        Commands::Tree(args) => tagtree::cli::tree::run(args, &config)?,
        Commands::Export(args) => tagtree::cli::export::run(args, &config)?,
    }

    Ok(())
}
