use anyhow::Context;
use chance_core::LotteryConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.json";
const DB_FILE: &str = "chance.db";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub lottery: LotteryConfig,
}

impl CliConfig {
    /// Read `config.json` from the data directory, falling back to defaults
    pub fn load(data_dir: PathBuf) -> anyhow::Result<Self> {
        let lottery = read_lottery_config(&data_dir.join(CONFIG_FILE))?;
        lottery.validate()?;

        Ok(Self { data_dir, lottery })
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }
}

fn read_lottery_config(path: &Path) -> anyhow::Result<LotteryConfig> {
    if !path.exists() {
        return Ok(LotteryConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid config file {}", path.display()))?;

    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}
