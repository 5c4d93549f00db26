//! Scripted signals: replays a fixed directive per bar index.
//!
//! Useful for tests and demos where the exact signal sequence matters more
//! than how it was derived.

use std::collections::BTreeMap;

use super::SignalSource;
use crate::domain::{Bar, Signal, SignalKind};

#[derive(Debug, Clone)]
pub struct ScriptedSignals {
    script: Vec<Option<SignalKind>>,
    cursor: usize,
}

impl ScriptedSignals {
    pub const NAME: &'static str = "scripted";

    /// `script[i]` is the answer for the i-th bar of a pass; bars past the end get `None`.
    pub fn new(script: Vec<Option<SignalKind>>) -> Self {
        Self { script, cursor: 0 }
    }
}

impl SignalSource for ScriptedSignals {
    fn initialize(&mut self) {
        self.cursor = 0;
    }

    fn on_data(&mut self, bar: &Bar) -> Option<Signal> {
        let step = self.script.get(self.cursor).copied().flatten();
        self.cursor += 1;
        step.map(|kind| Signal::new(bar.timestamp, bar.symbol.clone(), kind))
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn parameters(&self) -> BTreeMap<String, String> {
        BTreeMap::from([("length".to_string(), self.script.len().to_string())])
    }
}
