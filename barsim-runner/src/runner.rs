//! Backtest runner: the composition root.
//!
//! Turns a [`BacktestConfig`] into a bar supplier and a strategy instance,
//! runs a fresh engine, and packages everything into a [`BacktestResult`].

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use barsim_core::analytics::PerformanceReport;
use barsim_core::data::{BarSupplier, CsvBarSource, DataError, InMemoryBars, SyntheticSource};
use barsim_core::domain::{EquityPoint, Order};
use barsim_core::engine::{EngineError, ReplayEngine};
use barsim_core::strategy::{StrategyError, StrategyRegistry};

use crate::config::{BacktestConfig, ConfigError, DataSourceKind, RunId};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] DataError),
    #[error("strategy error: {0}")]
    Strategy(#[from] StrategyError),
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: RunId,
    pub symbol: String,
    pub strategy: String,
    pub parameters: BTreeMap<String, String>,
    pub initial_capital: f64,
    pub report: PerformanceReport,
    pub orders: Vec<Order>,
    pub equity_curve: Vec<EquityPoint>,
    pub bar_count: usize,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl BacktestResult {
    /// Equity after the last bar, or the initial capital when nothing was replayed.
    pub fn final_equity(&self) -> f64 {
        self.equity_curve
            .last()
            .map(|p| p.equity)
            .unwrap_or(self.initial_capital)
    }
}

/// Build the bar supplier named by the `[data]` section.
///
/// CSV files are read eagerly so a missing or malformed file surfaces as an
/// error here instead of an empty replay.
pub fn build_supplier(config: &BacktestConfig) -> Result<Arc<dyn BarSupplier>, RunError> {
    match config.data.source {
        DataSourceKind::Synthetic => Ok(Arc::new(SyntheticSource)),
        DataSourceKind::Csv => {
            let path = config
                .data
                .path
                .as_ref()
                .ok_or_else(|| ConfigError::Invalid("csv data source requires a path".into()))?;
            let bars = CsvBarSource::new(path).load_all()?;
            Ok(Arc::new(InMemoryBars::new(bars)))
        }
    }
}

/// Run a single backtest from a config, building the supplier from `[data]`.
pub fn run_single_backtest(
    config: &BacktestConfig,
    registry: &StrategyRegistry,
) -> Result<BacktestResult, RunError> {
    config.validate()?;
    let supplier = build_supplier(config)?;
    run_with_supplier(config, registry, supplier)
}

/// Run a backtest against an already-built supplier. No I/O of its own.
pub fn run_with_supplier(
    config: &BacktestConfig,
    registry: &StrategyRegistry,
    supplier: Arc<dyn BarSupplier>,
) -> Result<BacktestResult, RunError> {
    let strategy = registry.create(&config.strategy.strategy_type, &config.strategy.params)?;
    let strategy_name = strategy.name().to_string();
    let parameters = strategy.parameters();
    let run_id = config.run_id();

    info!(
        run_id = %run_id,
        strategy = %strategy_name,
        symbol = %config.backtest.symbol,
        "running backtest"
    );

    let mut engine = ReplayEngine::builder()
        .supplier(supplier)
        .strategy(strategy)
        .config(config.to_engine_config())
        .build()?;
    let report = engine.run()?.clone();

    Ok(BacktestResult {
        schema_version: SCHEMA_VERSION,
        run_id,
        symbol: config.backtest.symbol.clone(),
        strategy: strategy_name,
        parameters,
        initial_capital: config.backtest.initial_capital,
        report,
        orders: engine.order_history().to_vec(),
        equity_curve: engine.equity_curve().to_vec(),
        bar_count: engine.bar_count(),
    })
}
