//! Bar supplier trait, timeframes and structured error types.
//!
//! The `BarSupplier` trait abstracts over bar sources (in-memory sets, CSV
//! files, synthetic walks, multi-source feeds) so the engine can treat them as
//! a black box and tests can swap them freely.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::Bar;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("unsupported timeframe '{0}'")]
    UnsupportedTimeframe(String),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),
}

/// Bar interval requested from a supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Timeframe {
    Minute1,
    Minute5,
    Minute15,
    Hour1,
    Hour4,
    Day1,
    Week1,
}

impl Timeframe {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minute1 => "1m",
            Self::Minute5 => "5m",
            Self::Minute15 => "15m",
            Self::Hour1 => "1h",
            Self::Hour4 => "4h",
            Self::Day1 => "1d",
            Self::Week1 => "1w",
        }
    }

    /// Length of one bar.
    pub fn duration(self) -> Duration {
        match self {
            Self::Minute1 => Duration::minutes(1),
            Self::Minute5 => Duration::minutes(5),
            Self::Minute15 => Duration::minutes(15),
            Self::Hour1 => Duration::hours(1),
            Self::Hour4 => Duration::hours(4),
            Self::Day1 => Duration::days(1),
            Self::Week1 => Duration::weeks(1),
        }
    }
}

impl Default for Timeframe {
    fn default() -> Self {
        Self::Day1
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(Self::Minute1),
            "5m" => Ok(Self::Minute5),
            "15m" => Ok(Self::Minute15),
            "1h" => Ok(Self::Hour1),
            "4h" => Ok(Self::Hour4),
            "1d" => Ok(Self::Day1),
            "1w" => Ok(Self::Week1),
            other => Err(DataError::UnsupportedTimeframe(other.to_string())),
        }
    }
}

impl TryFrom<String> for Timeframe {
    type Error = DataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Timeframe> for String {
    fn from(tf: Timeframe) -> Self {
        tf.as_str().to_string()
    }
}

/// Trait for historical bar suppliers.
///
/// Implementations return bars for one symbol inside `[start, end]`. Ordering
/// is a courtesy: the engine re-sorts by timestamp before replaying.
pub trait BarSupplier: Send + Sync {
    /// Human-readable name of this supplier.
    fn name(&self) -> &str;

    /// Fetch bars for `symbol` with timestamps in `[start, end]`.
    fn get_historical_bars(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        timeframe: Timeframe,
    ) -> Result<Vec<Bar>, DataError>;
}

/// Supplier over a fixed set of bars held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBars {
    bars: Vec<Bar>,
}

impl InMemoryBars {
    pub fn new(bars: Vec<Bar>) -> Self {
        Self { bars }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

impl BarSupplier for InMemoryBars {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn get_historical_bars(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        _timeframe: Timeframe,
    ) -> Result<Vec<Bar>, DataError> {
        Ok(filter_range(&self.bars, symbol, start, end))
    }
}

/// Bars matching `symbol` with timestamps in `[start, end]`, in input order.
pub(crate) fn filter_range(
    bars: &[Bar],
    symbol: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<Bar> {
    bars.iter()
        .filter(|b| b.symbol == symbol && b.timestamp >= start && b.timestamp <= end)
        .cloned()
        .collect()
}
