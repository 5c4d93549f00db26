//! barsim runner: config files, the composition root, batch runs and export.
//!
//! This crate builds on `barsim-core` to provide:
//! - TOML backtest configuration with validation and content-addressed run ids
//! - Single-run composition (supplier + registry strategy + fresh engine)
//! - Parallel batch runs with one engine and one strategy per run
//! - CSV/JSON artifact export

pub mod batch;
pub mod config;
pub mod export;
pub mod runner;

pub use batch::{run_batch, try_run_batch};
pub use config::{BacktestConfig, ConfigError, DataSourceKind, RunId};
pub use export::{
    export_json, import_json, save_artifacts, write_equity_csv, write_orders_csv,
    write_report_json, ArtifactPaths, ExportError,
};
pub use runner::{build_supplier, run_single_backtest, run_with_supplier, BacktestResult, RunError};
