//! Inspect the offline asset cache on disk.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use runtime::{CacheStorage, FileCacheStorage};

use crate::dirs;

/// List cached asset versions and their entries
#[derive(Parser, Debug)]
pub struct InspectCache {
    /// Only show this cache version
    #[arg(long)]
    pub name: Option<String>,

    /// Print entry details as JSON
    #[arg(long)]
    pub json: bool,
}

impl InspectCache {
    pub fn execute(self) -> Result<()> {
        let root = dirs::offline_cache_dir();
        if !root.exists() {
            println!(
                "{} {}",
                style("No offline cache at").dim(),
                style(root.display()).dim()
            );
            return Ok(());
        }

        let storage = FileCacheStorage::new(&root)
            .with_context(|| format!("Failed to open cache at {}", root.display()))?;
        let names: Vec<String> = match self.name {
            Some(name) => vec![name],
            None => storage.cache_names()?,
        };

        if !self.json {
            println!("{}", style("=== Offline Asset Cache ===").bold().green());
            println!("{} {}", style("Root:").bold().cyan(), root.display());
        }

        let mut report = serde_json::Map::new();
        for name in names {
            let mut entries = Vec::new();
            for url in storage.urls(&name)? {
                let Some(response) = storage.lookup(&name, &url)? else {
                    continue;
                };
                entries.push(response);
            }

            if self.json {
                let details = entries
                    .iter()
                    .map(|r| {
                        serde_json::json!({
                            "url": r.url,
                            "status": r.status,
                            "content_type": r.content_type,
                            "bytes": r.body.len(),
                            "stored_at": r.stored_at,
                        })
                    })
                    .collect();
                report.insert(name, serde_json::Value::Array(details));
                continue;
            }

            println!();
            println!(
                "{} {}",
                style(&name).bold().yellow(),
                style(format!("({} entries)", entries.len())).dim()
            );
            for response in entries {
                println!(
                    "  {} {:<32} {:>8} bytes  {}",
                    style(response.status).green(),
                    response.url,
                    response.body.len(),
                    style(response.content_type.as_deref().unwrap_or("-")).dim()
                );
            }
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Ok(())
    }
}
