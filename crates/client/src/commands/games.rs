//! Static listings that need neither the arcade nor the cache.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use game_content::WebAppManifest;
use game_core::{GameKind, SelectionPolicy};
use strum::IntoEnumIterator;

/// List the mini-games
#[derive(Parser, Debug)]
pub struct Games {}

impl Games {
    pub fn execute(self) -> Result<()> {
        println!("{}", style("=== Treehouse Games ===").bold().green());
        for kind in GameKind::iter() {
            let order = match (kind.is_round_based(), kind.selection_policy()) {
                (false, _) => "rhythm loop",
                (true, SelectionPolicy::Random) => "random rounds",
                (true, SelectionPolicy::Cyclic) => "in order",
            };
            println!(
                "  {:<12} {} {}",
                style(kind).cyan().bold(),
                kind.title(),
                style(format!("({})", order)).dim()
            );
        }
        Ok(())
    }
}

/// Print the installable web app manifest
#[derive(Parser, Debug)]
pub struct WebManifest {
    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

impl WebManifest {
    pub fn execute(self) -> Result<()> {
        let json = WebAppManifest::treehouse()
            .to_json()
            .context("Failed to serialize web manifest")?;
        match self.out {
            Some(path) => {
                std::fs::write(&path, json)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("{} {}", style("Wrote").green().bold(), path.display());
            }
            None => println!("{}", json),
        }
        Ok(())
    }
}
