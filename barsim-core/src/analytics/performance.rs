//! Performance report: the end-of-run reduction of equity curve and orders.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::metrics::{
    annualized_return, duration_years, max_drawdown, sharpe_ratio, total_return, volatility,
};
use super::trades::trade_stats;
use crate::domain::{EquityPoint, Order};

/// Aggregate statistics for one replay.
///
/// `sharpe_ratio` is per-step (unannualized) while `volatility` is annualized
/// by √252. `total_trades` counts raw orders and `win_rate` divides by it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub total_return: f64,
    pub annualized_return: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub volatility: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub average_profit: f64,
    pub average_loss: f64,
    pub largest_profit: f64,
    pub largest_loss: f64,
    /// Supplemental metrics keyed by name.
    pub metrics: BTreeMap<String, f64>,
}

impl PerformanceReport {
    /// Compute every field from a finished run. An empty curve yields the all-zero report.
    pub fn compute(equity_curve: &[EquityPoint], orders: &[Order], initial_capital: f64) -> Self {
        let Some(last) = equity_curve.last() else {
            return Self::default();
        };

        let total = total_return(equity_curve, initial_capital);
        let trades = trade_stats(orders);

        let metrics = BTreeMap::from([
            ("final_equity".to_string(), last.equity),
            ("round_trips".to_string(), trades.round_trips as f64),
            ("duration_years".to_string(), duration_years(equity_curve)),
        ]);

        Self {
            total_return: total,
            annualized_return: annualized_return(equity_curve, total),
            sharpe_ratio: sharpe_ratio(equity_curve, 0.0),
            max_drawdown: max_drawdown(equity_curve),
            volatility: volatility(equity_curve),
            total_trades: trades.total_trades,
            winning_trades: trades.winning_trades,
            losing_trades: trades.losing_trades,
            win_rate: trades.win_rate(),
            profit_factor: trades.profit_factor(),
            average_profit: trades.average_profit(),
            average_loss: trades.average_loss(),
            largest_profit: trades.largest_profit,
            largest_loss: trades.largest_loss,
            metrics,
        }
    }

    /// True when every scalar is zero and the metric map is empty.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Free-function form of [`PerformanceReport::compute`].
pub fn compute(equity_curve: &[EquityPoint], orders: &[Order], initial_capital: f64) -> PerformanceReport {
    PerformanceReport::compute(equity_curve, orders, initial_capital)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderId, OrderSide};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn empty_curve_is_all_zero() {
        let r = compute(&[], &[], 10_000.0);
        assert!(r.is_zero());
        assert!(r.metrics.is_empty());
    }

    #[test]
    fn three_bar_round_trip() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let curve = vec![
            EquityPoint::new(t0, 10_000.0),
            EquityPoint::new(t0 + Duration::days(1), 10_900.0),
            EquityPoint::new(t0 + Duration::days(2), 11_800.0),
        ];
        let orders = vec![
            Order::filled_market(OrderId(1), "BTCUSDT", t0, OrderSide::Buy, 90.0, 100.0),
            Order::filled_market(
                OrderId(2),
                "BTCUSDT",
                t0 + Duration::days(2),
                OrderSide::Sell,
                90.0,
                120.0,
            ),
        ];
        let r = compute(&curve, &orders, 10_000.0);
        assert!((r.total_return - 0.18).abs() < 1e-12);
        assert_eq!(r.max_drawdown, 0.0);
        assert_eq!(r.total_trades, 2);
        assert_eq!(r.winning_trades, 1);
        assert_eq!(r.losing_trades, 0);
        assert!((r.win_rate - 0.5).abs() < 1e-12);
        assert!((r.largest_profit - 1_800.0).abs() < 1e-9);
        assert!((r.average_profit - 1_800.0).abs() < 1e-9);
        assert_eq!(r.profit_factor, 0.0);
        assert!(r.annualized_return > 0.18);
        assert!(r.volatility > 0.0);
        assert_eq!(r.metrics["final_equity"], 11_800.0);
        assert_eq!(r.metrics["round_trips"], 1.0);
    }

    #[test]
    fn single_point_curve() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let r = compute(&[EquityPoint::new(t0, 9_000.0)], &[], 10_000.0);
        assert!((r.total_return + 0.1).abs() < 1e-12);
        assert_eq!(r.annualized_return, 0.0);
        assert_eq!(r.sharpe_ratio, 0.0);
        assert_eq!(r.volatility, 0.0);
        assert_eq!(r.metrics["duration_years"], 0.0);
    }
}
