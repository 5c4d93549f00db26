//! barsim core: replay engine, execution simulator and performance analytics.
//!
//! - Domain types (bars, signals, orders, portfolio, equity points)
//! - Bar supplier seam with in-memory, CSV, synthetic and multi-source suppliers
//! - Signal source seam with an explicit strategy registry
//! - Single-symbol, fully-filled, mark-at-close replay loop
//! - Pure analytics over the equity curve and order history

pub mod analytics;
pub mod data;
pub mod domain;
pub mod engine;
pub mod strategy;

pub use analytics::PerformanceReport;
pub use engine::{EngineConfig, EngineError, ReplayEngine};
