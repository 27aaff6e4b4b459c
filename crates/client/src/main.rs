//! Treehouse client binary.
//!
//! Composition root: loads configuration, sets up logging, assembles the
//! arcade and offline cache through [`ClientBuilder`], then runs one
//! subcommand.
//!
//! # Features
//!
//! - `audio`: synthesized tones through the default output device
//!
//! # Examples
//!
//! ```bash
//! # Play the letter game with tones
//! cargo run -p treehouse-client --features audio -- play letters
//!
//! # Prefetch the offline asset cache
//! TREEHOUSE_ASSET_BASE_URL=https://example.org/app/ cargo run -p treehouse-client -- install
//! ```

mod commands;
mod feedback;
mod logging;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use client_bootstrap::{ClientBuilder, ClientConfig};
use runtime::{FeedbackEngine, SilentFeedback};

use commands::{Fetch, Games, Install, Play, Status, WebManifest};
use feedback::ClientFeedback;

/// Treehouse learning arcade
#[derive(Parser)]
#[command(name = "treehouse")]
#[command(about = "Mini-games for early readers, in the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Mirror logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Play one mini-game
    Play(Play),

    /// List the mini-games
    Games(Games),

    /// Install (or adopt) the offline asset cache
    Install(Install),

    /// Serve one asset, cache first
    Fetch(Fetch),

    /// Show offline cache status as JSON
    Status(Status),

    /// Print the installable web app manifest
    WebManifest(WebManifest),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = ClientConfig::from_env();
    logging::setup_logging(&config.session_id, cli.verbose)?;
    tracing::debug!("Asset base URL: {}", config.asset_base_url);

    match cli.command {
        Command::Games(cmd) => cmd.execute(),
        Command::WebManifest(cmd) => cmd.execute(),
        Command::Play(cmd) => {
            let mute = config.mute || cmd.mute;
            cmd.execute(client_builder(config, mute)).await
        }
        Command::Install(cmd) => cmd.execute(client_builder(config, true)).await,
        Command::Fetch(cmd) => cmd.execute(client_builder(config, true)).await,
        Command::Status(cmd) => cmd.execute(client_builder(config, true)).await,
    }
}

fn client_builder(config: ClientConfig, mute: bool) -> ClientBuilder {
    let feedback: Arc<dyn FeedbackEngine> = if mute {
        Arc::new(SilentFeedback)
    } else {
        Arc::new(ClientFeedback::new())
    };
    ClientBuilder::new(config).feedback(feedback)
}
