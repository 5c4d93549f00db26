//! Equity curve points.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One sample of the equity curve, taken after a bar is fully processed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: DateTime<Utc>,
    pub equity: f64,
}

impl EquityPoint {
    pub fn new(timestamp: DateTime<Utc>, equity: f64) -> Self {
        Self { timestamp, equity }
    }
}
