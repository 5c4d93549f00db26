//! Integration tests for the replay engine.
//!
//! Tests:
//! 1. Three-bar BUY/HOLD/SELL trace matches hand-computed cash and equity
//! 2. Empty and failing suppliers degrade to an empty curve and zero report
//! 3. SELL without a position leaves cash and order history untouched
//! 4. Construction and lifecycle errors
//! 5. Two fresh engines over the same input serialize identically
//! 6. Bars arrive unsorted and are replayed in timestamp order

use std::sync::Arc;

use barsim_core::data::{BarSupplier, DataError, InMemoryBars, Timeframe};
use barsim_core::domain::{Bar, OrderSide, OrderStatus, SignalKind};
use barsim_core::engine::{EngineConfig, EngineError, ReplayEngine, RunState, SkipReason};
use barsim_core::strategy::{MaCrossover, ScriptedSignals, SignalSource};
use chrono::{DateTime, Duration, TimeZone, Utc};

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn bars(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar::new(t0() + Duration::days(i as i64), "BTCUSDT", c, c, c, c, 1_000.0))
        .collect()
}

fn config() -> EngineConfig {
    EngineConfig::new(t0(), t0() + Duration::days(365), 10_000.0).with_fractional_shares(true)
}

fn build(supplier: Arc<dyn BarSupplier>, strategy: Box<dyn SignalSource>, config: EngineConfig) -> ReplayEngine {
    ReplayEngine::builder()
        .supplier(supplier)
        .strategy(strategy)
        .config(config)
        .build()
        .unwrap()
}

fn scripted(closes: &[f64], script: Vec<Option<SignalKind>>) -> ReplayEngine {
    build(
        Arc::new(InMemoryBars::new(bars(closes))),
        Box::new(ScriptedSignals::new(script)),
        config(),
    )
}

struct BrokenSupplier;

impl BarSupplier for BrokenSupplier {
    fn name(&self) -> &str {
        "broken"
    }

    fn get_historical_bars(
        &self,
        symbol: &str,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
        _timeframe: Timeframe,
    ) -> Result<Vec<Bar>, DataError> {
        Err(DataError::SymbolNotFound {
            symbol: symbol.to_string(),
        })
    }
}

// ──────────────────────────────────────────────
// 1. Hand-computed trace
// ──────────────────────────────────────────────

#[test]
fn buy_hold_sell_trace() {
    let mut engine = scripted(
        &[100.0, 110.0, 120.0],
        vec![Some(SignalKind::Buy), Some(SignalKind::Hold), Some(SignalKind::Sell)],
    );
    let report = engine.run().unwrap().clone();

    let equity: Vec<f64> = engine.equity_curve().iter().map(|p| p.equity).collect();
    assert_eq!(equity.len(), 3);
    assert!((equity[0] - 10_000.0).abs() < 1e-9);
    assert!((equity[1] - 10_900.0).abs() < 1e-9);
    assert!((equity[2] - 11_800.0).abs() < 1e-9);

    let orders = engine.order_history();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].side, OrderSide::Buy);
    assert!((orders[0].quantity - 90.0).abs() < 1e-12);
    assert_eq!(orders[0].price, 100.0);
    assert_eq!(orders[1].side, OrderSide::Sell);
    assert_eq!(orders[1].price, 120.0);
    assert!(orders.iter().all(|o| o.status == OrderStatus::Filled));

    assert!((engine.portfolio().cash - 11_800.0).abs() < 1e-9);
    assert_eq!(engine.portfolio().position("BTCUSDT"), 0.0);

    assert!((report.total_return - 0.18).abs() < 1e-12);
    assert_eq!(report.total_trades, 2);
    assert_eq!(report.winning_trades, 1);
    assert_eq!(report.max_drawdown, 0.0);
    assert!((report.largest_profit - 1_800.0).abs() < 1e-9);
}

#[test]
fn commission_reduces_cash_on_both_legs() {
    let cfg = config().with_commission(0.01);
    let mut engine = build(
        Arc::new(InMemoryBars::new(bars(&[100.0, 100.0]))),
        Box::new(ScriptedSignals::new(vec![Some(SignalKind::Buy), Some(SignalKind::Sell)])),
        cfg,
    );
    engine.run().unwrap();
    // buy: invest 9000, 90 units, commission 90 -> cash 910
    // sell: 9000 proceeds, commission 90 -> cash 9820
    assert!((engine.portfolio().cash - 9_820.0).abs() < 1e-9);
    assert_eq!(engine.order_history()[0].commission(), 90.0);
}

// ──────────────────────────────────────────────
// 2. Degenerate inputs
// ──────────────────────────────────────────────

#[test]
fn empty_supplier_yields_zero_report() {
    let mut engine = scripted(&[], vec![Some(SignalKind::Buy)]);
    let report = engine.run().unwrap();
    assert!(report.is_zero());
    assert!(engine.equity_curve().is_empty());
    assert!(engine.order_history().is_empty());
    assert_eq!(engine.state(), RunState::Completed);
}

#[test]
fn failing_supplier_is_treated_as_empty() {
    let mut engine = build(
        Arc::new(BrokenSupplier),
        Box::new(ScriptedSignals::new(vec![Some(SignalKind::Buy)])),
        config(),
    );
    assert!(engine.run().unwrap().is_zero());
    assert!(engine.equity_curve().is_empty());
}

#[test]
fn bars_for_other_symbols_are_not_replayed() {
    let mut other = bars(&[1.0, 2.0]);
    for b in &mut other {
        b.symbol = "ETHUSDT".into();
    }
    let mut engine = build(
        Arc::new(InMemoryBars::new(other)),
        Box::new(ScriptedSignals::new(vec![])),
        config(),
    );
    engine.run().unwrap();
    assert_eq!(engine.bar_count(), 0);
}

// ──────────────────────────────────────────────
// 3. Silent skips
// ──────────────────────────────────────────────

#[test]
fn sell_without_position_is_a_no_op() {
    let mut engine = scripted(&[100.0, 101.0], vec![Some(SignalKind::Sell), Some(SignalKind::Sell)]);
    engine.run().unwrap();
    assert!(engine.order_history().is_empty());
    assert_eq!(engine.portfolio().cash, 10_000.0);
    assert!(engine
        .skipped()
        .iter()
        .all(|s| s.reason == SkipReason::NoPosition));
    assert_eq!(engine.performance_report().total_trades, 0);
}

#[test]
fn whole_share_buy_with_too_little_cash_is_skipped() {
    let cfg = config().with_fractional_shares(false);
    let mut engine = build(
        Arc::new(InMemoryBars::new(bars(&[20_000.0]))),
        Box::new(ScriptedSignals::new(vec![Some(SignalKind::Buy)])),
        cfg,
    );
    engine.run().unwrap();
    assert!(engine.order_history().is_empty());
    assert_eq!(engine.skipped()[0].reason, SkipReason::InsufficientCash);
    assert_eq!(engine.equity_curve()[0].equity, 10_000.0);
}

// ──────────────────────────────────────────────
// 4. Lifecycle
// ──────────────────────────────────────────────

#[test]
fn missing_collaborators_fail_construction() {
    let no_supplier = ReplayEngine::builder()
        .strategy(Box::new(ScriptedSignals::new(vec![])))
        .build();
    assert!(matches!(no_supplier, Err(EngineError::InvalidArgument(_))));

    let no_strategy = ReplayEngine::builder()
        .supplier(Arc::new(InMemoryBars::new(vec![])))
        .build();
    assert!(matches!(no_strategy, Err(EngineError::InvalidArgument(_))));
}

#[test]
fn engine_runs_once() {
    let mut engine = scripted(&[100.0], vec![Some(SignalKind::Buy)]);
    engine.run().unwrap();
    let orders_after_first = engine.order_history().len();
    assert!(matches!(engine.run(), Err(EngineError::AlreadyCompleted)));
    assert_eq!(engine.order_history().len(), orders_after_first);
}

// ──────────────────────────────────────────────
// 5. Determinism
// ──────────────────────────────────────────────

#[test]
fn fresh_engines_produce_identical_output() {
    let closes: Vec<f64> = (0..200)
        .map(|i| 100.0 + (i as f64 * 0.17).sin() * 12.0 + i as f64 * 0.05)
        .collect();
    let supplier: Arc<dyn BarSupplier> = Arc::new(InMemoryBars::new(bars(&closes)));

    let run = || {
        let mut engine = build(
            Arc::clone(&supplier),
            Box::new(MaCrossover::new(5, 20).unwrap()),
            config().with_commission(0.001),
        );
        engine.run().unwrap();
        (
            serde_json::to_string(engine.performance_report()).unwrap(),
            serde_json::to_string(engine.equity_curve()).unwrap(),
            serde_json::to_string(engine.order_history()).unwrap(),
        )
    };

    let first = run();
    let second = run();
    assert_eq!(first, second);
    assert_ne!(first.2, "[]", "crossover should trade on an oscillating series");
}

// ──────────────────────────────────────────────
// 6. Ordering
// ──────────────────────────────────────────────

#[test]
fn unsorted_bars_are_replayed_chronologically() {
    let mut shuffled = bars(&[100.0, 110.0, 120.0]);
    shuffled.reverse();
    let mut engine = build(
        Arc::new(InMemoryBars::new(shuffled)),
        Box::new(ScriptedSignals::new(vec![Some(SignalKind::Buy), None, Some(SignalKind::Sell)])),
        config(),
    );
    engine.run().unwrap();
    let ts: Vec<_> = engine.equity_curve().iter().map(|p| p.timestamp).collect();
    assert!(ts.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(engine.order_history()[0].price, 100.0);
    assert!((engine.performance_report().total_return - 0.18).abs() < 1e-12);
}
