//! Offline asset cache commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use client_bootstrap::ClientBuilder;
use runtime::{CacheState, ResponseSource};

/// Install (or adopt) the offline asset cache
#[derive(Parser, Debug)]
pub struct Install {
    /// Refetch every asset even when the current version is stored
    #[arg(long)]
    pub force: bool,
}

impl Install {
    pub async fn execute(self, builder: ClientBuilder) -> Result<()> {
        let setup = builder.build()?;
        let cache = setup.cache;

        let state = if self.force {
            cache.install().await?;
            cache.state().await
        } else {
            cache.ensure_installed().await?
        };

        let status = cache.status().await?;
        let marker = match state {
            CacheState::Active => style("✓").green().bold(),
            _ => style("…").yellow().bold(),
        };
        println!(
            "{} {} is {:?} ({} entries)",
            marker,
            style(&status.cache_name).cyan(),
            state,
            status.entries
        );
        Ok(())
    }
}

/// Serve one asset, cache first
#[derive(Parser, Debug)]
pub struct Fetch {
    /// Asset URL as listed in the cache manifest (e.g. `./index.html`)
    pub url: String,

    /// Write the body to a file
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

impl Fetch {
    pub async fn execute(self, builder: ClientBuilder) -> Result<()> {
        let setup = builder.build()?;
        let served = setup
            .cache
            .respond(&self.url)
            .await
            .with_context(|| format!("Failed to serve {}", self.url))?;

        let source = match &served.source {
            ResponseSource::Cache { cache_name } => format!("cache {}", cache_name),
            ResponseSource::Network => "network".to_owned(),
        };
        println!(
            "{} {} {} bytes from {}",
            style(served.response.status).bold(),
            style(&served.response.url).cyan(),
            served.response.body.len(),
            style(source).yellow()
        );

        if let Some(path) = self.out {
            std::fs::write(&path, &served.response.body)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        Ok(())
    }
}

/// Show offline cache status as JSON
#[derive(Parser, Debug)]
pub struct Status {}

impl Status {
    pub async fn execute(self, builder: ClientBuilder) -> Result<()> {
        let setup = builder.build()?;
        let status = setup.cache.status().await?;
        println!("{}", serde_json::to_string_pretty(&status)?);
        Ok(())
    }
}
