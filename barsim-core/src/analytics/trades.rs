//! Trade statistics over the order history.
//!
//! Orders are paired by position: (orders[0], orders[1]), (orders[2], orders[3]), ...
//! The first of each pair is the entry. A trailing unpaired order, including an
//! open position at the end of a run, is ignored. Sides are not matched, so two
//! consecutive BUYs pair with each other.

use serde::{Deserialize, Serialize};

use crate::domain::{Order, OrderSide};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeStats {
    /// Raw order count, not pair count.
    pub total_trades: usize,
    pub round_trips: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub total_profit: f64,
    /// Sum of losses as a positive number.
    pub total_loss: f64,
    pub largest_profit: f64,
    /// Largest single loss as a positive number.
    pub largest_loss: f64,
}

impl TradeStats {
    /// winning / total_trades (raw orders).
    pub fn win_rate(&self) -> f64 {
        if self.total_trades == 0 {
            return 0.0;
        }
        self.winning_trades as f64 / self.total_trades as f64
    }

    /// total_profit / total_loss. 0.0 when there are no losses.
    pub fn profit_factor(&self) -> f64 {
        if self.losing_trades > 0 && self.total_loss > 0.0 {
            self.total_profit / self.total_loss
        } else {
            0.0
        }
    }

    pub fn average_profit(&self) -> f64 {
        if self.winning_trades == 0 {
            return 0.0;
        }
        self.total_profit / self.winning_trades as f64
    }

    pub fn average_loss(&self) -> f64 {
        if self.losing_trades == 0 {
            return 0.0;
        }
        self.total_loss / self.losing_trades as f64
    }
}

/// Profit of one positional pair. Commission is not deducted.
pub fn pair_profit(entry: &Order, exit: &Order) -> f64 {
    match entry.side {
        OrderSide::Buy => exit.notional() - entry.notional(),
        OrderSide::Sell => entry.notional() - exit.notional(),
    }
}

pub fn trade_stats(orders: &[Order]) -> TradeStats {
    let mut stats = TradeStats {
        total_trades: orders.len(),
        ..TradeStats::default()
    };

    for pair in orders.chunks_exact(2) {
        let profit = pair_profit(&pair[0], &pair[1]);
        stats.round_trips += 1;
        if profit > 0.0 {
            stats.winning_trades += 1;
            stats.total_profit += profit;
            stats.largest_profit = stats.largest_profit.max(profit);
        } else {
            let loss = profit.abs();
            stats.losing_trades += 1;
            stats.total_loss += loss;
            stats.largest_loss = stats.largest_loss.max(loss);
        }
    }

    stats
}
