//! Performance analytics: pure reductions over a finished run.
//!
//! Nothing here depends on the engine. Everything takes the equity curve
//! and/or order history and returns plain numbers.

pub mod metrics;
pub mod performance;
pub mod trades;

pub use metrics::{
    annualized_return, drawdown_series, duration_years, max_drawdown, sharpe_ratio,
    step_returns, total_return, volatility, PERIODS_PER_YEAR,
};
pub use performance::{compute, PerformanceReport};
pub use trades::{pair_profit, trade_stats, TradeStats};
