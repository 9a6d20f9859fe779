// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::info;

/// Public FPL API root. Every endpoint path is joined onto this.
pub const DEFAULT_BASE_URL: &str = "https://fantasy.premierleague.com/api/";

/// Env var naming a YAML config file to load instead of the defaults.
pub const CONFIG_ENV: &str = "FPL_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "fplscraper.yaml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub output: OutputConfig,
    /// Number of gameweeks to collect. Derived from finished events when unset.
    pub weeks: Option<u32>,
    pub mode: AggregationMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per request, including the first. 1 disables retries.
    pub max_attempts: u32,
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub season_file: PathBuf,
    pub weeks_dir: PathBuf,
}

/// How the week aggregator walks the gameweek range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMode {
    /// Weeks `1..=N`, merged once after the loop.
    #[default]
    Standard,
    /// Weeks `1..N` with a merge after every week.
    Legacy,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            retry: RetryConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 1000,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            season_file: PathBuf::from("players.parquet"),
            weeks_dir: PathBuf::from("weeks_data"),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Config {
    /// Parse a YAML config file. Missing sections fall back to defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
        serde_yaml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// `$FPL_CONFIG` if set, else `./fplscraper.yaml` if present, else defaults.
    pub fn load() -> Result<Self> {
        if let Ok(path) = env::var(CONFIG_ENV) {
            info!(path = %path, "loading config from {}", CONFIG_ENV);
            return Self::from_yaml_file(path);
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            info!(path = %local.display(), "loading config");
            return Self::from_yaml_file(local);
        }
        Ok(Self::default())
    }
}
