//! Buy-and-hold: one BUY on the first bar, then silence.

use std::collections::BTreeMap;

use super::SignalSource;
use crate::domain::{Bar, Signal};

#[derive(Debug, Clone, Default)]
pub struct BuyAndHold {
    entered: bool,
}

impl BuyAndHold {
    pub const NAME: &'static str = "buy_and_hold";

    pub fn new() -> Self {
        Self::default()
    }
}

impl SignalSource for BuyAndHold {
    fn initialize(&mut self) {
        self.entered = false;
    }

    fn on_data(&mut self, bar: &Bar) -> Option<Signal> {
        if self.entered {
            return None;
        }
        self.entered = true;
        Some(Signal::buy(bar.timestamp, bar.symbol.clone()))
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn parameters(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }
}
