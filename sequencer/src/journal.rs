//! Append-only transaction journal
//!
//! One JSON object per line:
//! `{"height": 12, "caller": "<base58>", "command": {"op": "deposit", "amount": 5}}`.
//! Blank lines and lines starting with `#` are skipped.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use stakied_core::{Address, BlockHeight, Command};
use std::path::Path;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub height: BlockHeight,
    pub caller: Address,
    pub command: Command,
}

/// Parse a whole journal; errors name the offending line
pub fn parse(text: &str) -> Result<Vec<JournalEntry>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(i, line)| {
            serde_json::from_str(line).context(format!("Malformed journal entry on line {}", i + 1))
        })
        .collect()
}

pub async fn read(path: &Path) -> Result<Vec<JournalEntry>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .context(format!("Failed to read journal: {}", path.display()))?;
    parse(&text)
}

/// Append one entry, creating the journal if needed
pub async fn append(path: &Path, entry: &JournalEntry) -> Result<()> {
    let mut line = serde_json::to_string(entry).context("Failed to encode journal entry")?;
    line.push('\n');

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .context(format!("Failed to open journal: {}", path.display()))?;
    file.write_all(line.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}
