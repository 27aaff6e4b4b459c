//! Clean logs and the offline asset cache
//!
//! Safety: prompts for confirmation before deleting anything.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::dirs;

/// Clean logs and the offline asset cache
#[derive(Parser, Debug)]
pub struct Clean {
    /// Clean only logs
    #[arg(long)]
    pub logs: bool,

    /// Clean only the offline asset cache
    #[arg(long)]
    pub cache: bool,

    /// Skip confirmation prompt (dangerous!)
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Specific log session to clean (only works with --logs)
    #[arg(long)]
    pub session: Option<String>,
}

impl Clean {
    pub fn execute(self) -> Result<()> {
        // Neither flag means both.
        let clean_logs = self.logs || !self.cache;
        let clean_cache = self.cache || !self.logs;

        if self.session.is_some() && !self.logs {
            anyhow::bail!("--session can only be used with --logs");
        }

        let targets = self.targets(clean_logs, clean_cache)?;
        if targets.is_empty() {
            println!(
                "{}",
                style("Nothing to clean - directories don't exist yet").dim()
            );
            return Ok(());
        }

        println!("{}", style("🧹 Clean Treehouse Data").yellow().bold());
        println!();
        println!("The following will be deleted:");
        for (label, path) in &targets {
            println!("  {} {}", style("→").cyan(), style(label).bold());
            println!("    {}", style(path.display()).dim());
        }
        println!();

        if !self.yes && !confirm()? {
            println!("{}", style("Cancelled").dim());
            return Ok(());
        }

        for (label, path) in targets {
            print!("Deleting {}... ", label);
            io::stdout().flush()?;
            std::fs::remove_dir_all(&path)
                .with_context(|| format!("Failed to delete: {}", path.display()))?;
            println!("{}", style("✓").green());
        }

        println!();
        println!("{}", style("✓ Cleanup complete!").green().bold());
        Ok(())
    }

    fn targets(&self, clean_logs: bool, clean_cache: bool) -> Result<Vec<(String, PathBuf)>> {
        let mut targets = Vec::new();

        if clean_logs {
            let log_dir = dirs::log_dir();
            if let Some(session_id) = &self.session {
                let session_dir = log_dir.join(session_id);
                if !session_dir.exists() {
                    eprintln!(
                        "{} Session not found: {}",
                        style("✗").red().bold(),
                        style(session_id).cyan()
                    );
                    anyhow::bail!("Session directory does not exist");
                }
                targets.push((format!("Session logs ({})", session_id), session_dir));
            } else if log_dir.exists() {
                targets.push(("All logs".to_string(), log_dir));
            }
        }

        if clean_cache {
            let cache_dir = dirs::offline_cache_dir();
            if cache_dir.exists() {
                targets.push(("Offline asset cache".to_string(), cache_dir));
            }
        }

        Ok(targets)
    }
}

fn confirm() -> Result<bool> {
    print!("{} ", style("Proceed? [y/N]").yellow().bold());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}
