//! Signal sources: the pluggable strategy seam.
//!
//! A signal source sees one bar at a time and may answer with a [`Signal`].
//! It owns whatever indicator history it needs, so one instance belongs to
//! exactly one chronological pass. Parallel runs each need their own instance;
//! build them through a [`StrategyRegistry`].

pub mod buy_and_hold;
pub mod ma_crossover;
pub mod registry;
pub mod scripted;
pub mod sma;

use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::{Bar, Signal};

pub use buy_and_hold::BuyAndHold;
pub use ma_crossover::MaCrossover;
pub use registry::{StrategyFactory, StrategyParams, StrategyRegistry, MAX_PERIOD};
pub use scripted::ScriptedSignals;
pub use sma::Sma;

/// Errors raised while building strategies.
#[derive(Debug, Error, PartialEq)]
pub enum StrategyError {
    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),

    #[error("invalid parameter '{name}' for {strategy}: {reason}")]
    InvalidParameter {
        strategy: String,
        name: String,
        reason: String,
    },
}

/// A strategy that turns bars into trade signals.
///
/// Implementations keep mutable per-run state; `initialize` must reset all of it.
pub trait SignalSource: Send {
    /// Reset internal indicator state before a replay.
    fn initialize(&mut self);

    /// Feed the next bar. `None` and a `Hold` signal both mean "do nothing".
    fn on_data(&mut self, bar: &Bar) -> Option<Signal>;

    /// Human-readable name (e.g., "ma_crossover").
    fn name(&self) -> &str;

    /// Parameter snapshot for reporting. Not read by the engine.
    fn parameters(&self) -> BTreeMap<String, String>;
}
