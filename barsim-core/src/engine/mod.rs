//! Replay engine: bar loop, execution simulator and run configuration.
//!
//! The engine owns all mutable run state (cash, positions, order history,
//! equity curve). Nothing is shared between engines, so parallel runs need
//! one engine and one signal source each.

pub mod config;
pub mod error;
pub mod replay;
pub mod simulator;

pub use config::{EngineConfig, DEFAULT_INITIAL_CAPITAL, DEFAULT_SYMBOL};
pub use error::EngineError;
pub use replay::{EngineBuilder, ReplayEngine, RunState, SkippedSignal};
pub use simulator::{ExecutionOutcome, ExecutionSimulator, SkipReason, INVEST_FRACTION};
