use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const CONFIG_PATH_ENV: &str = "TICKER_BOARD_CONFIG";
pub const DEFAULT_REST_BASE_URL: &str = "https://api1.binance.com";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub binance: BinanceConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// File the config was read from; `None` when built-in defaults are used.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BinanceConfig {
    #[serde(default = "default_rest_base_url")]
    pub rest_base_url: String,
    #[serde(default = "default_pairs")]
    pub pairs: Vec<PairConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PairConfig {
    pub symbol: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Fetches run independently; only the newest dispatched result is applied.
    #[default]
    Race,
    /// Ticks that fire while a fetch is in flight are skipped.
    Serialize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,
    #[serde(default)]
    pub overlap: OverlapPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_refresh_rate_ms")]
    pub refresh_rate_ms: u64,
    #[serde(default = "default_max_log_messages")]
    pub max_log_messages: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_rest_base_url() -> String {
    DEFAULT_REST_BASE_URL.to_string()
}

fn default_pairs() -> Vec<PairConfig> {
    vec![PairConfig {
        symbol: "BTCBUSD".to_string(),
        label: "BTC/BUSD".to_string(),
    }]
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_refresh_rate_ms() -> u64 {
    100
}

fn default_max_log_messages() -> usize {
    200
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            rest_base_url: default_rest_base_url(),
            pairs: default_pairs(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval_ms(),
            overlap: OverlapPolicy::default(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_ms: default_refresh_rate_ms(),
            max_log_messages: default_max_log_messages(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl BinanceConfig {
    /// Initial tracked pairs, trimmed, with symbols upper-cased.
    pub fn initial_pairs(&self) -> Vec<PairConfig> {
        self.pairs
            .iter()
            .map(|p| PairConfig {
                symbol: p.symbol.trim().to_ascii_uppercase(),
                label: p.label.trim().to_string(),
            })
            .collect()
    }
}

impl Config {
    /// Load from `$TICKER_BOARD_CONFIG` or `config/default.toml`. A missing
    /// file falls back to built-in defaults with `source` left empty.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        if !config_path.exists() {
            let config = Config::default();
            config.validate()?;
            return Ok(config);
        }
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .map_err(AppError::from)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut config = Self::from_toml_str(&config_str)
            .with_context(|| format!("failed to load {}", path.display()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Human-readable origin of the loaded settings.
    pub fn source_description(&self) -> String {
        match &self.source {
            Some(path) => path.display().to_string(),
            None => "built-in defaults".to_string(),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).context("failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll.interval_ms == 0 {
            bail!(AppError::Config("poll.interval_ms must be > 0".to_string()));
        }
        if self.binance.rest_base_url.trim().is_empty() {
            bail!(AppError::Config(
                "binance.rest_base_url must not be empty".to_string()
            ));
        }
        url::Url::parse(self.binance.rest_base_url.trim()).with_context(|| {
            format!(
                "binance.rest_base_url '{}' is not a valid URL",
                self.binance.rest_base_url
            )
        })?;
        for (i, pair) in self.binance.pairs.iter().enumerate() {
            if pair.symbol.trim().is_empty() || pair.label.trim().is_empty() {
                bail!(AppError::Config(format!(
                    "binance.pairs[{}] needs both a symbol and a label",
                    i
                )));
            }
        }
        Ok(())
    }
}
