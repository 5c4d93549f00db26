//! Portfolio: cash, held quantities and the last marked equity.

use super::bar::Bar;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate portfolio state for one replay.
///
/// `positions` is only ever mutated by the execution simulator. `equity` is
/// recomputed by [`Portfolio::mark_to_market`] on every bar and is never
/// carried forward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub cash: f64,
    pub equity: f64,
    pub positions: BTreeMap<String, f64>,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            cash: initial_capital,
            equity: initial_capital,
            positions: BTreeMap::new(),
        }
    }

    /// Held quantity for `symbol`, 0.0 if none.
    pub fn position(&self, symbol: &str) -> f64 {
        self.positions.get(symbol).copied().unwrap_or(0.0)
    }

    /// Whether a strictly positive quantity is held for `symbol`.
    pub fn has_position(&self, symbol: &str) -> bool {
        self.position(symbol) > 0.0
    }

    /// Recompute equity against `bar`: cash plus the value of every holding
    /// whose symbol matches the bar's symbol, marked at the bar's close.
    ///
    /// Holdings in other symbols contribute nothing; a replay feeds one symbol.
    pub fn mark_to_market(&mut self, bar: &Bar) -> f64 {
        let position_value: f64 = self
            .positions
            .iter()
            .filter(|(symbol, _)| symbol.as_str() == bar.symbol)
            .map(|(_, quantity)| quantity * bar.close)
            .sum();
        self.equity = self.cash + position_value;
        self.equity
    }
}
