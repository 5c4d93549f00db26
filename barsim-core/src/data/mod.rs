//! Historical bar suppliers.
//!
//! The engine consumes bars only through [`BarSupplier`]; everything in this
//! module is a collaborator the engine treats as a black box.

pub mod csv_source;
pub mod feed;
pub mod provider;
pub mod synthetic;

pub use csv_source::{read_bars, write_bars, CsvBarSource};
pub use feed::MultiSourceFeed;
pub use provider::{BarSupplier, DataError, InMemoryBars, Timeframe};
pub use synthetic::{synthetic_bars, SyntheticSource};
