//! Domain types for the bar replay simulator.

pub mod bar;
pub mod equity;
pub mod ids;
pub mod order;
pub mod portfolio;
pub mod signal;

pub use bar::Bar;
pub use equity::EquityPoint;
pub use ids::{IdGen, OrderId};
pub use order::{Order, OrderSide, OrderStatus, OrderType, COMMISSION_KEY};
pub use portfolio::Portfolio;
pub use signal::{Signal, SignalKind};
