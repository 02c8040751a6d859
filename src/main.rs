//! financing CLI
//!
//! Usage:
//!   financing schedule --principal 12000 --rate 0.12 --months 12 --method Price
//!   financing compare  --principal 12000 --rate 0.12 --months 12
//!   financing balance  --principal 12000 --rate 0.12 --months 12 --payments paid.json
//!   financing simulate --principal 11000 --rate 0.12 --months 11 --amount 5000 --preference reducao_parcela

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let output = commands::run(&cli.command)?;
    let rendered = if cli.compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };
    println!("{rendered}");

    Ok(())
}
