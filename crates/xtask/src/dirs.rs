//! Directory lookups shared with the client.
//!
//! Paths come from `client-bootstrap`, so xtask always looks where the client
//! writes, including `TREEHOUSE_CACHE_DIR` overrides.

use anyhow::{Context, Result};
use client_bootstrap::{ClientConfig, paths};
use std::path::{Path, PathBuf};

pub fn log_dir() -> PathBuf {
    paths::log_dir()
}

/// Offline asset cache root, honouring `TREEHOUSE_CACHE_DIR`.
pub fn offline_cache_dir() -> PathBuf {
    ClientConfig::from_env()
        .cache_dir
        .unwrap_or_else(paths::offline_cache_dir)
}

/// Session log directories, newest first.
pub fn list_sessions(log_dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    if !log_dir.exists() {
        return Ok(Vec::new());
    }

    let mut sessions = Vec::new();
    for entry in std::fs::read_dir(log_dir)
        .with_context(|| format!("Failed to read log directory: {}", log_dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir()
            && let Some(session_id) = path.file_name().and_then(|n| n.to_str())
        {
            let modified = entry.metadata()?.modified()?;
            sessions.push((session_id.to_string(), path.clone(), modified));
        }
    }

    sessions.sort_by(|a, b| b.2.cmp(&a.2));
    Ok(sessions
        .into_iter()
        .map(|(id, path, _)| (id, path))
        .collect())
}

/// Log file of `session_id`, or of the newest session.
pub fn session_log(log_dir: &Path, session_id: Option<&str>) -> Result<(String, PathBuf)> {
    let session_id = match session_id {
        Some(id) => id.to_owned(),
        None => list_sessions(log_dir)?
            .into_iter()
            .next()
            .map(|(id, _)| id)
            .context("No sessions found in log directory")?,
    };

    let log_path = log_dir.join(&session_id).join("client.log");
    if !log_path.exists() {
        anyhow::bail!("Log file not found: {}", log_path.display());
    }
    Ok((session_id, log_path))
}
