//! zenkly - bulk administration of a Zendesk account from the command line
//!
//! # Usage
//!
//! ```bash
//! # Store credentials once
//! zenkly configure
//!
//! # Export, edit, replay
//! zenkly get-macros --directory backups
//! zenkly update-macros --directory backups --filename macros.json
//!
//! # Use another profile
//! zenkly --profile sandbox show-brands
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use zenkly::cli::Cli;
use zenkly::commands;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore errors if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr; stdout carries command output
    let default_filter = if cli.global.debug {
        "zenkly=debug,reqwest=debug"
    } else {
        "zenkly=warn"
    };
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!(
        profile = %cli.global.profile,
        "Starting zenkly v{}",
        env!("CARGO_PKG_VERSION")
    );

    commands::dispatch(cli.command, &cli.global).await
}
