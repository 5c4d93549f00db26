//! Order records produced by the execution simulator.

use super::ids::OrderId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Metadata key under which the simulator records the charged commission.
pub const COMMISSION_KEY: &str = "commission";

/// What kind of order. The simulator only ever produces `Market`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Market,
    Limit,
    Stop,
    StopLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => f.write_str("BUY"),
            Self::Sell => f.write_str("SELL"),
        }
    }
}

/// Order lifecycle states.
///
/// Orders created by this system are terminal `Filled` on creation; the other
/// states exist so records from elsewhere can be represented and matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Submitted,
    Accepted,
    Rejected,
    Canceled,
    Filled,
    PartiallyFilled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Canceled | Self::Filled)
    }
}

/// An immutable order record appended to the engine's order history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub order_type: OrderType,
    pub side: OrderSide,
    pub quantity: f64,
    pub price: f64,
    pub filled_quantity: f64,
    pub average_price: f64,
    pub status: OrderStatus,
    pub metadata: BTreeMap<String, String>,
}

impl Order {
    /// A market order filled completely at `price`.
    pub fn filled_market(
        id: OrderId,
        symbol: impl Into<String>,
        timestamp: DateTime<Utc>,
        side: OrderSide,
        quantity: f64,
        price: f64,
    ) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            timestamp,
            order_type: OrderType::Market,
            side,
            quantity,
            price,
            filled_quantity: quantity,
            average_price: price,
            status: OrderStatus::Filled,
            metadata: BTreeMap::new(),
        }
    }

    /// Quantity × price.
    pub fn notional(&self) -> f64 {
        self.quantity * self.price
    }

    /// Commission recorded in the metadata, 0.0 if absent or unparsable.
    pub fn commission(&self) -> f64 {
        self.metadata
            .get(COMMISSION_KEY)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.0)
    }

    pub fn remaining_quantity(&self) -> f64 {
        self.quantity - self.filled_quantity
    }
}
