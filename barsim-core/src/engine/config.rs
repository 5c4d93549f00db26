//! Replay configuration.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::data::Timeframe;

pub const DEFAULT_SYMBOL: &str = "BTCUSDT";
pub const DEFAULT_INITIAL_CAPITAL: f64 = 100_000.0;

/// Configuration for a single replay. Plain value, no persistence of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub initial_capital: f64,
    /// Proportional fee on traded notional, e.g. 0.001 = 10 bps.
    pub commission_rate: f64,
    pub use_fractional_shares: bool,
    pub symbol: String,
    pub timeframe: Timeframe,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            start_time: DateTime::<Utc>::MIN_UTC,
            end_time: DateTime::<Utc>::MAX_UTC,
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            commission_rate: 0.0,
            use_fractional_shares: false,
            symbol: DEFAULT_SYMBOL.to_string(),
            timeframe: Timeframe::default(),
        }
    }
}

impl EngineConfig {
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>, initial_capital: f64) -> Self {
        Self {
            start_time,
            end_time,
            initial_capital,
            ..Self::default()
        }
    }

    pub fn with_commission(mut self, rate: f64) -> Self {
        self.commission_rate = rate;
        self
    }

    pub fn with_fractional_shares(mut self, enabled: bool) -> Self {
        self.use_fractional_shares = enabled;
        self
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    pub fn with_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = timeframe;
        self
    }

    /// Convenience for whole-day ranges given as (y, m, d).
    pub fn for_dates(start: (i32, u32, u32), end: (i32, u32, u32), initial_capital: f64) -> Option<Self> {
        let start = Utc.with_ymd_and_hms(start.0, start.1, start.2, 0, 0, 0).single()?;
        let end = Utc.with_ymd_and_hms(end.0, end.1, end.2, 23, 59, 59).single()?;
        Some(Self::new(start, end, initial_capital))
    }
}
