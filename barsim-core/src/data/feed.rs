//! Multi-source feed: tries suppliers in order, first non-empty result wins.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use super::provider::{BarSupplier, DataError, Timeframe};
use crate::domain::Bar;

/// Aggregates several suppliers behind one `BarSupplier`.
///
/// Resolution order for a request:
/// 1. If the symbol is pinned to a supplier, that supplier's answer is returned as-is.
/// 2. Otherwise each source is tried in insertion order; failures and empty
///    results are skipped.
/// 3. If nothing produced bars, the result is an empty vector (never an error).
#[derive(Default, Clone)]
pub struct MultiSourceFeed {
    sources: Vec<Arc<dyn BarSupplier>>,
    pinned: HashMap<String, Arc<dyn BarSupplier>>,
}

impl MultiSourceFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source to the fallback chain.
    pub fn add_source(&mut self, source: Arc<dyn BarSupplier>) -> &mut Self {
        self.sources.push(source);
        self
    }

    /// Route every request for `symbol` to `source`.
    pub fn pin_symbol(&mut self, symbol: impl Into<String>, source: Arc<dyn BarSupplier>) -> &mut Self {
        self.pinned.insert(symbol.into(), source);
        self
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }
}

impl BarSupplier for MultiSourceFeed {
    fn name(&self) -> &str {
        "multi_source"
    }

    fn get_historical_bars(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        timeframe: Timeframe,
    ) -> Result<Vec<Bar>, DataError> {
        if let Some(source) = self.pinned.get(symbol) {
            return source.get_historical_bars(symbol, start, end, timeframe);
        }

        for source in &self.sources {
            match source.get_historical_bars(symbol, start, end, timeframe) {
                Ok(bars) if !bars.is_empty() => {
                    debug!(source = source.name(), symbol, count = bars.len(), "bars resolved");
                    return Ok(bars);
                }
                Ok(_) => {
                    debug!(source = source.name(), symbol, "source returned no bars");
                }
                Err(err) => {
                    warn!(source = source.name(), symbol, error = %err, "source failed, trying next");
                }
            }
        }

        Ok(Vec::new())
    }
}
