use serde::{Deserialize, Serialize};
use std::fmt;

/// Order ID, sequential within one replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ORD-{:06}", self.0)
    }
}

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Monotonic ID source. Each engine owns one, so two fresh engines over the
/// same input hand out identical IDs.
#[derive(Debug, Clone, Default)]
pub struct IdGen {
    next_order: u64,
}

impl IdGen {
    pub fn next_order_id(&mut self) -> OrderId {
        self.next_order += 1;
        OrderId(self.next_order)
    }
}
