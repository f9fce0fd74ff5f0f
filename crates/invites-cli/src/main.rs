//! invites - batch mailer for wedding invitations.
//!
//! `invites import` turns the guest spreadsheet into stored parties;
//! `invites mail` renders envelopes and drafts (or sends) the invitation
//! emails for the parties the configured sender is responsible for.

mod cli;
mod import;
mod mail;

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use invites_core::store::JsonPartyStore;
use invites_core::Config;

use cli::{Cli, Command};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing();

    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let store_path = match cli.parties_file {
        Some(ref path) => path.clone(),
        None => config.store_path()?,
    };
    let store = JsonPartyStore::new(store_path)?;
    info!(store = %store.path().display(), "Using party store");

    match cli.command {
        Command::Import(args) => import::run(&config, &store, &args).await,
        Command::Mail(args) => mail::run(&store, &args).await,
    }
}
