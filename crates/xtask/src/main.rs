//! Development tasks for the Treehouse project
//!
//! This binary provides development utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;
mod dirs;

use anyhow::Result;
use clap::Parser;
use commands::{Clean, InspectCache, TailLogs};

/// Development tasks for the Treehouse project
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tools for Treehouse", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Monitor client logs in real-time
    TailLogs(TailLogs),

    /// Clean logs and the offline asset cache
    Clean(Clean),

    /// List cached asset versions and their entries
    InspectCache(InspectCache),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for TREEHOUSE_CACHE_DIR and other env vars)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.command {
        Command::TailLogs(cmd) => cmd.execute(),
        Command::Clean(cmd) => cmd.execute(),
        Command::InspectCache(cmd) => cmd.execute(),
    }
}
