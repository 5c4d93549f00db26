//! Replay engine: the bar loop.
//!
//! One engine performs exactly one replay:
//! 1. initialize the signal source
//! 2. fetch bars for the configured symbol/timeframe and stable-sort by timestamp
//! 3. per bar: on_data → execute non-HOLD signals → mark to market → append equity
//! 4. reduce the run into a [`PerformanceReport`]

use std::sync::Arc;

use tracing::{info, warn};

use super::config::EngineConfig;
use super::error::EngineError;
use super::simulator::{ExecutionOutcome, ExecutionSimulator, SkipReason};
use crate::analytics::PerformanceReport;
use crate::data::BarSupplier;
use crate::domain::{Bar, EquityPoint, IdGen, Order, Portfolio, Signal};
use crate::strategy::SignalSource;

/// Lifecycle of a [`ReplayEngine`]. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Constructed,
    Running,
    Completed,
}

/// A signal that produced no order, kept for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSignal {
    pub signal: Signal,
    pub reason: SkipReason,
}

pub struct ReplayEngine {
    supplier: Arc<dyn BarSupplier>,
    strategy: Box<dyn SignalSource>,
    config: EngineConfig,
    simulator: ExecutionSimulator,
    state: RunState,
    portfolio: Portfolio,
    ids: IdGen,
    orders: Vec<Order>,
    equity_curve: Vec<EquityPoint>,
    skipped: Vec<SkippedSignal>,
    bar_count: usize,
    report: PerformanceReport,
}

impl std::fmt::Debug for ReplayEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplayEngine")
            .field("supplier", &self.supplier.name())
            .field("strategy", &self.strategy.name())
            .field("config", &self.config)
            .field("state", &self.state)
            .field("orders", &self.orders.len())
            .field("equity_points", &self.equity_curve.len())
            .finish()
    }
}

impl ReplayEngine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Replay every bar and compute the report.
    ///
    /// Never fails once started: a supplier error is logged and replayed as
    /// an empty bar sequence. Errors only on a second call.
    pub fn run(&mut self) -> Result<&PerformanceReport, EngineError> {
        if self.state != RunState::Constructed {
            return Err(EngineError::AlreadyCompleted);
        }
        self.state = RunState::Running;

        info!(
            strategy = self.strategy.name(),
            supplier = self.supplier.name(),
            symbol = %self.config.symbol,
            timeframe = %self.config.timeframe,
            initial_capital = self.config.initial_capital,
            "replay starting"
        );

        self.strategy.initialize();

        let mut bars = self.fetch_bars();
        bars.sort_by_key(|bar| bar.timestamp);
        self.bar_count = bars.len();

        for bar in &bars {
            self.step(bar);
        }

        self.report = PerformanceReport::compute(
            &self.equity_curve,
            &self.orders,
            self.config.initial_capital,
        );
        self.state = RunState::Completed;

        info!(
            bars = self.bar_count,
            orders = self.orders.len(),
            skipped = self.skipped.len(),
            final_equity = self.portfolio.equity,
            total_return = self.report.total_return,
            "replay complete"
        );

        Ok(&self.report)
    }

    fn fetch_bars(&self) -> Vec<Bar> {
        let result = self.supplier.get_historical_bars(
            &self.config.symbol,
            self.config.start_time,
            self.config.end_time,
            self.config.timeframe,
        );
        match result {
            Ok(bars) => {
                if bars.is_empty() {
                    warn!(symbol = %self.config.symbol, "supplier returned no bars");
                }
                bars
            }
            Err(e) => {
                warn!(symbol = %self.config.symbol, error = %e, "supplier failed; replaying no bars");
                Vec::new()
            }
        }
    }

    fn step(&mut self, bar: &Bar) {
        if let Some(signal) = self.strategy.on_data(bar) {
            if signal.kind.is_actionable() {
                let outcome =
                    self.simulator
                        .execute(&signal, bar, &mut self.portfolio, &mut self.ids);
                match outcome {
                    ExecutionOutcome::Executed(order) => self.orders.push(order),
                    ExecutionOutcome::Skipped(reason) => {
                        self.skipped.push(SkippedSignal { signal, reason })
                    }
                }
            }
        }

        let equity = self.portfolio.mark_to_market(bar);
        self.equity_curve.push(EquityPoint::new(bar.timestamp, equity));
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The report. All-zero until [`run`](Self::run) completes.
    pub fn performance_report(&self) -> &PerformanceReport {
        &self.report
    }

    /// Filled orders in execution order. Empty before the run.
    pub fn order_history(&self) -> &[Order] {
        &self.orders
    }

    /// One point per replayed bar. Empty before the run.
    pub fn equity_curve(&self) -> &[EquityPoint] {
        &self.equity_curve
    }

    /// Actionable signals that produced no order.
    pub fn skipped(&self) -> &[SkippedSignal] {
        &self.skipped
    }

    /// Cash and positions as of the last bar, or the initial state before the run.
    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// Number of bars replayed. 0 before the run.
    pub fn bar_count(&self) -> usize {
        self.bar_count
    }

    pub fn strategy(&self) -> &dyn SignalSource {
        self.strategy.as_ref()
    }
}

/// Assembles a [`ReplayEngine`]; both collaborators are required.
#[derive(Default)]
pub struct EngineBuilder {
    supplier: Option<Arc<dyn BarSupplier>>,
    strategy: Option<Box<dyn SignalSource>>,
    config: EngineConfig,
}

impl EngineBuilder {
    pub fn supplier(mut self, supplier: Arc<dyn BarSupplier>) -> Self {
        self.supplier = Some(supplier);
        self
    }

    pub fn strategy(mut self, strategy: Box<dyn SignalSource>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<ReplayEngine, EngineError> {
        let supplier = self
            .supplier
            .ok_or(EngineError::InvalidArgument("bar supplier is required"))?;
        let strategy = self
            .strategy
            .ok_or(EngineError::InvalidArgument("signal source is required"))?;
        let config = self.config;

        Ok(ReplayEngine {
            supplier,
            strategy,
            simulator: ExecutionSimulator::new(config.commission_rate, config.use_fractional_shares),
            state: RunState::Constructed,
            portfolio: Portfolio::new(config.initial_capital),
            ids: IdGen::default(),
            orders: Vec::new(),
            equity_curve: Vec::new(),
            skipped: Vec::new(),
            bar_count: 0,
            report: PerformanceReport::default(),
            config,
        })
    }
}
