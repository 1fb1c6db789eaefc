//! Bulk operations for Discord guilds: mass channel creation and
//! deletion, slash-command replay, and OAuth2 invite links.
//!
//! Every batch-capable subcommand runs through the same engine, the
//! batched concurrent [dispatcher](dispatch) with rate-limit backoff.

use clap::Parser;
use cli::Cli;
use dotenvy::dotenv;
use tracing::warn;

mod cli;
mod commands;
mod discord;
mod dispatch;
mod error;

/// Application entrypoint. Initialises tracing, loads the environment,
/// and hands over to the chosen subcommand.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    let has_dotenv = dotenv().is_ok();
    if !has_dotenv {
        warn!("No .env found");
    }

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli).await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
