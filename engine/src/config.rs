use anyhow::{anyhow, Context};
use common::text::RenderOptions;
use log::{info, LevelFilter};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::game::round::DEFAULT_HAND_SIZE;

/// Host-provided settings. Every field has a default so a partial (or absent) file is fine.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Directory holding the saved plays, preferences and flags documents
    pub data_dir: PathBuf,
    pub catalog_path: PathBuf,
    pub hand_size: usize,
    pub render: RenderOptions,
    pub log: LogConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            data_dir: PathBuf::from("./data"),
            catalog_path: PathBuf::from("./cards.json"),
            hand_size: DEFAULT_HAND_SIZE,
            render: RenderOptions::default(),
            log: LogConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e).context("Error reading config file"),
        };

        let config = serde_json::from_str::<Self>(&json).context("Error deserializing config")?;
        if config.hand_size == 0 {
            return Err(anyhow!("hand size must be at least 1"));
        }
        config.log.level_filter()?;
        Ok(config)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    /// Also write the log to this file
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "info".to_owned(),
            file: None,
        }
    }
}

impl LogConfig {
    pub fn level_filter(&self) -> anyhow::Result<LevelFilter> {
        LevelFilter::from_str(&self.level).map_err(|_| anyhow!("Invalid log level {:?}", self.level))
    }
}
