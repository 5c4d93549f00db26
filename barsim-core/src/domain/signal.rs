//! Trade signals emitted by a signal source, one bar at a time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Directive carried by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalKind {
    Buy,
    Sell,
    Hold,
}

impl SignalKind {
    /// Whether the engine forwards this kind to the execution simulator.
    pub fn is_actionable(self) -> bool {
        !matches!(self, Self::Hold)
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
        };
        f.write_str(s)
    }
}

/// A transient trade directive, consumed by the simulator on the bar it was emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub kind: SignalKind,
    /// Conviction in `[0, 1]`. Informational; sizing ignores it.
    pub strength: f64,
    pub metadata: BTreeMap<String, String>,
}

impl Signal {
    /// Full-strength signal with no metadata.
    pub fn new(timestamp: DateTime<Utc>, symbol: impl Into<String>, kind: SignalKind) -> Self {
        Self {
            timestamp,
            symbol: symbol.into(),
            kind,
            strength: 1.0,
            metadata: BTreeMap::new(),
        }
    }

    pub fn buy(timestamp: DateTime<Utc>, symbol: impl Into<String>) -> Self {
        Self::new(timestamp, symbol, SignalKind::Buy)
    }

    pub fn sell(timestamp: DateTime<Utc>, symbol: impl Into<String>) -> Self {
        Self::new(timestamp, symbol, SignalKind::Sell)
    }

    pub fn hold(timestamp: DateTime<Utc>, symbol: impl Into<String>) -> Self {
        Self::new(timestamp, symbol, SignalKind::Hold)
    }

    /// Set the strength, clamped to `[0, 1]`. NaN becomes 0.
    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = if strength.is_nan() {
            0.0
        } else {
            strength.clamp(0.0, 1.0)
        };
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
