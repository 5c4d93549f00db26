//! Backtest configuration files.
//!
//! ```toml
//! [backtest]
//! symbol = "BTCUSDT"
//! start = "2024-01-01"
//! end = "2024-12-31"
//! initial_capital = 10000.0
//! commission_rate = 0.001
//! use_fractional_shares = false
//! timeframe = "1d"
//!
//! [strategy]
//! type = "ma_crossover"
//!
//! [strategy.params]
//! fast_period = 5
//! slow_period = 20
//!
//! [data]
//! source = "csv"
//! path = "data/btcusdt.csv"
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use barsim_core::data::Timeframe;
use barsim_core::engine::{EngineConfig, DEFAULT_SYMBOL};
use barsim_core::strategy::StrategyParams;

/// Unique identifier for a backtest run (content-addressable hash).
pub type RunId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub backtest: BacktestSection,
    pub strategy: StrategySection,
    #[serde(default)]
    pub data: DataSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSection {
    #[serde(default = "default_symbol")]
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default = "default_initial_capital")]
    pub initial_capital: f64,
    #[serde(default)]
    pub commission_rate: f64,
    #[serde(default)]
    pub use_fractional_shares: bool,
    #[serde(default)]
    pub timeframe: Timeframe,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySection {
    #[serde(rename = "type")]
    pub strategy_type: String,
    #[serde(default)]
    pub params: StrategyParams,
}

/// Where bars come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSourceKind {
    Csv,
    #[default]
    Synthetic,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSection {
    #[serde(default)]
    pub source: DataSourceKind,
    /// CSV file path. Relative paths resolve against the working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

fn default_symbol() -> String {
    DEFAULT_SYMBOL.to_string()
}

fn default_initial_capital() -> f64 {
    barsim_core::engine::DEFAULT_INITIAL_CAPITAL
}

impl BacktestConfig {
    /// Load from a TOML file and validate.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse from a TOML string and validate.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let bt = &self.backtest;
        if bt.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("symbol must not be empty".into()));
        }
        if !(bt.initial_capital.is_finite() && bt.initial_capital > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "initial_capital must be positive, got {}",
                bt.initial_capital
            )));
        }
        if !(0.0..1.0).contains(&bt.commission_rate) {
            return Err(ConfigError::Invalid(format!(
                "commission_rate must be in [0, 1), got {}",
                bt.commission_rate
            )));
        }
        if bt.start > bt.end {
            return Err(ConfigError::Invalid(format!(
                "start {} is after end {}",
                bt.start, bt.end
            )));
        }
        if self.strategy.strategy_type.trim().is_empty() {
            return Err(ConfigError::Invalid("strategy type must not be empty".into()));
        }
        if self.data.source == DataSourceKind::Csv && self.data.path.is_none() {
            return Err(ConfigError::Invalid("csv data source requires a path".into()));
        }
        Ok(())
    }

    /// First instant of `start` through the last second of `end`, in UTC.
    pub fn time_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self.backtest.start.and_time(chrono::NaiveTime::MIN).and_utc();
        let end = self
            .backtest
            .end
            .and_hms_opt(23, 59, 59)
            .map(|dt| dt.and_utc())
            .unwrap_or(start);
        (start, end)
    }

    pub fn to_engine_config(&self) -> EngineConfig {
        let (start, end) = self.time_range();
        EngineConfig::new(start, end, self.backtest.initial_capital)
            .with_commission(self.backtest.commission_rate)
            .with_fractional_shares(self.backtest.use_fractional_shares)
            .with_symbol(self.backtest.symbol.clone())
            .with_timeframe(self.backtest.timeframe)
    }

    /// Deterministic hash of the whole configuration.
    ///
    /// Two runs with identical configs share a RunId.
    pub fn run_id(&self) -> RunId {
        // Every field is a plain value with BTreeMap-ordered params, so this
        // cannot fail and always yields the same bytes.
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
