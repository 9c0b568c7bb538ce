//! Sequencer configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use stakied_core::{Address, BlockHeight, ProtocolParams};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Exchange-rate owner written into the genesis state
    pub owner: Address,

    /// Block height of the genesis state
    pub genesis_height: BlockHeight,

    /// JSON-lines transaction journal to replay
    pub journal_path: String,

    /// Where to write the final protocol snapshot (JSON), if anywhere
    pub snapshot_path: Option<String>,

    /// Capacity of the actor's request queue
    pub queue_capacity: usize,

    /// Protocol parameters; omitted fields take their defaults
    #[serde(default)]
    pub params: ProtocolParams,
}

impl Config {
    /// Load configuration from `$STAKIED_CONFIG` (default `stakied.toml`)
    pub fn load() -> Result<Self> {
        let config_path =
            std::env::var("STAKIED_CONFIG").unwrap_or_else(|_| "stakied.toml".to_string());
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path);
        let config_str = std::fs::read_to_string(expanded.as_ref())
            .context(format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&config_str).context("Failed to parse config TOML")?;
        config
            .params
            .validate()
            .context("Invalid protocol parameters")?;

        Ok(config)
    }

    /// Local single-node defaults
    pub fn default_local() -> Self {
        Self {
            owner: Address::new([1u8; 32]),
            genesis_height: 0,
            journal_path: "~/.stakied/journal.jsonl".to_string(),
            snapshot_path: None,
            queue_capacity: 1024,
            params: ProtocolParams::default(),
        }
    }

    pub fn journal_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.journal_path).as_ref())
    }

    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.snapshot_path
            .as_deref()
            .map(|p| PathBuf::from(shellexpand::tilde(p).as_ref()))
    }

    /// Write default config to file
    pub fn write_default(path: &str) -> Result<()> {
        let config = Self::default_local();
        let toml_str = toml::to_string_pretty(&config).context("Failed to serialize config")?;

        std::fs::write(path, toml_str).context(format!("Failed to write config to {}", path))?;

        log::info!("Created default config at {}", path);
        Ok(())
    }
}
