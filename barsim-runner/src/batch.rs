//! Parallel batch runs.
//!
//! Every config gets its own supplier, strategy instance and engine, so runs
//! share nothing but the registry (which only hands out fresh instances).

use rayon::prelude::*;
use tracing::info;

use barsim_core::strategy::StrategyRegistry;

use crate::config::BacktestConfig;
use crate::runner::{run_single_backtest, BacktestResult, RunError};

/// Run every config in parallel. Results keep input order; one failure does
/// not stop the others.
pub fn run_batch(
    configs: &[BacktestConfig],
    registry: &StrategyRegistry,
) -> Vec<Result<BacktestResult, RunError>> {
    info!(runs = configs.len(), "starting batch");
    let results: Vec<_> = configs
        .par_iter()
        .map(|config| run_single_backtest(config, registry))
        .collect();
    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(runs = results.len(), failed, "batch complete");
    results
}

/// Like [`run_batch`] but fails on the first error (in input order).
pub fn try_run_batch(
    configs: &[BacktestConfig],
    registry: &StrategyRegistry,
) -> Result<Vec<BacktestResult>, RunError> {
    run_batch(configs, registry).into_iter().collect()
}
