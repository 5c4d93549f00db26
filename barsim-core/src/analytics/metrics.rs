//! Equity-curve metrics: pure functions, curve in, scalar out.
//!
//! Every function defines its own empty/degenerate case and returns 0.0 there
//! instead of NaN or infinity.

use crate::domain::EquityPoint;

/// Trading periods per year used to annualize volatility.
pub const PERIODS_PER_YEAR: f64 = 252.0;

const SECONDS_PER_YEAR: f64 = 365.25 * 24.0 * 60.0 * 60.0;

/// (final - initial) / initial. 0.0 for an empty curve or non-positive capital.
pub fn total_return(equity_curve: &[EquityPoint], initial_capital: f64) -> f64 {
    let Some(last) = equity_curve.last() else {
        return 0.0;
    };
    if initial_capital <= 0.0 {
        return 0.0;
    }
    (last.equity - initial_capital) / initial_capital
}

/// Elapsed time between the first and last curve points, in 365.25-day years.
pub fn duration_years(equity_curve: &[EquityPoint]) -> f64 {
    match (equity_curve.first(), equity_curve.last()) {
        (Some(first), Some(last)) => {
            let seconds = (last.timestamp - first.timestamp).num_seconds() as f64;
            seconds / SECONDS_PER_YEAR
        }
        _ => 0.0,
    }
}

/// Compound annual growth implied by `total_return` over the curve's wall-clock span.
///
/// 0.0 when the span is not positive.
pub fn annualized_return(equity_curve: &[EquityPoint], total_return: f64) -> f64 {
    let years = duration_years(equity_curve);
    if years <= 0.0 {
        return 0.0;
    }
    (1.0 + total_return).powf(1.0 / years) - 1.0
}

/// Drawdown fraction at every point, measured from the running peak.
///
/// The peak starts at the first point. Points at or above the peak read 0.0.
pub fn drawdown_series(equity_curve: &[EquityPoint]) -> Vec<f64> {
    let Some(first) = equity_curve.first() else {
        return Vec::new();
    };
    let mut peak = first.equity;
    equity_curve
        .iter()
        .map(|p| {
            if p.equity > peak {
                peak = p.equity;
            }
            drawdown(peak, p.equity)
        })
        .collect()
}

/// Largest peak-to-trough decline as a positive fraction in [0, 1].
pub fn max_drawdown(equity_curve: &[EquityPoint]) -> f64 {
    let Some(first) = equity_curve.first() else {
        return 0.0;
    };
    let mut peak = first.equity;
    let mut worst = 0.0_f64;
    for p in equity_curve {
        if p.equity > peak {
            peak = p.equity;
        } else {
            worst = worst.max(drawdown(peak, p.equity));
        }
    }
    worst
}

fn drawdown(peak: f64, equity: f64) -> f64 {
    if peak <= 0.0 {
        return 0.0;
    }
    ((peak - equity) / peak).clamp(0.0, 1.0)
}

/// Per-step simple returns, skipping steps whose prior equity is not positive.
pub fn step_returns(equity_curve: &[EquityPoint]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .filter(|w| w[0].equity > 0.0)
        .map(|w| (w[1].equity - w[0].equity) / w[0].equity)
        .collect()
}

/// Annualized volatility: population std of step returns × √252.
pub fn volatility(equity_curve: &[EquityPoint]) -> f64 {
    if equity_curve.len() < 2 {
        return 0.0;
    }
    let returns = step_returns(equity_curve);
    if returns.is_empty() {
        return 0.0;
    }
    population_std(&returns) * PERIODS_PER_YEAR.sqrt()
}

/// Sharpe ratio over step returns: (mean - rf) / std.
///
/// Not annualized, unlike [`volatility`], which scales the same std by √252.
/// Both are reported as-is so results stay comparable with earlier runs.
pub fn sharpe_ratio(equity_curve: &[EquityPoint], risk_free_rate: f64) -> f64 {
    if equity_curve.len() < 2 {
        return 0.0;
    }
    let returns = step_returns(equity_curve);
    if returns.is_empty() {
        return 0.0;
    }
    let std = population_std(&returns);
    if std == 0.0 {
        return 0.0;
    }
    (mean(&returns) - risk_free_rate) / std
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_std(values: &[f64]) -> f64 {
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}
