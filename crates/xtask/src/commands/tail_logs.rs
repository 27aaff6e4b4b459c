//! Tail client logs command
//!
//! Follows a client log file like `tail -f`, optionally keeping only lines
//! that mention one session worker or cache event.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use crate::dirs;

/// Monitor client logs in real-time
#[derive(Parser, Debug)]
pub struct TailLogs {
    /// Log session to follow (defaults to the newest)
    pub session: Option<String>,

    /// Number of lines to show from history before following
    #[arg(short = 'n', long, default_value = "10")]
    pub lines: usize,

    /// Only print lines containing this text (e.g. `session-1`, `Installed`)
    #[arg(short, long)]
    pub filter: Option<String>,

    /// List log sessions and exit
    #[arg(long)]
    pub list: bool,

    /// Poll interval in milliseconds
    #[arg(long, default_value = "100")]
    pub poll_interval: u64,
}

impl TailLogs {
    pub fn execute(self) -> Result<()> {
        let log_dir = dirs::log_dir();
        if !log_dir.exists() {
            eprintln!("{}", style("✗ Log directory not found").red().bold());
            eprintln!("  Path: {}", style(log_dir.display()).dim());
            eprintln!();
            eprintln!("  Run the client first to generate logs:");
            eprintln!(
                "    {}",
                style("cargo run -p treehouse-client -- play letters").cyan()
            );
            anyhow::bail!("Log directory does not exist");
        }

        if self.list {
            for (session_id, path) in dirs::list_sessions(&log_dir)? {
                println!("{}  {}", style(session_id).cyan(), style(path.display()).dim());
            }
            return Ok(());
        }

        let (session_id, log_path) = dirs::session_log(&log_dir, self.session.as_deref())
            .context("Failed to find a log file")?;

        println!("{}", style("📝 Monitoring Treehouse Logs").green().bold());
        println!("  Session:  {}", style(&session_id).cyan());
        println!("  Log file: {}", style(log_path.display()).dim());
        if let Some(filter) = &self.filter {
            println!("  Filter:   {}", style(filter).yellow());
        }
        println!();

        self.follow(&log_path)
    }

    fn matches(&self, line: &str) -> bool {
        self.filter
            .as_deref()
            .is_none_or(|filter| line.contains(filter))
    }

    /// Prints the last matching lines, then every new matching line.
    fn follow(&self, path: &Path) -> Result<()> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
        let mut reader = BufReader::new(file);

        // History is read through the same reader, which then sits at EOF.
        let mut history = Vec::new();
        let mut line = String::new();
        while reader.read_line(&mut line)? > 0 {
            if self.matches(&line) {
                history.push(std::mem::take(&mut line));
            }
            line.clear();
        }
        let start = history.len().saturating_sub(self.lines);
        for line in &history[start..] {
            print!("{}", line);
        }

        let poll_interval = Duration::from_millis(self.poll_interval);
        loop {
            line.clear();
            match reader.read_line(&mut line) {
                Ok(0) => std::thread::sleep(poll_interval),
                Ok(_) => {
                    if self.matches(&line) {
                        print!("{}", line);
                    }
                }
                Err(e) => {
                    eprintln!("{}", style(format!("Error reading log file: {}", e)).red());
                    anyhow::bail!("Failed to read log file");
                }
            }
        }
    }
}
