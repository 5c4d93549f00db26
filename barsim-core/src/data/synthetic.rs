//! Deterministic synthetic bars for demos, benches and tests.
//!
//! A random walk from 100.0, seeded from the BLAKE3 hash of the symbol so the
//! same request always yields the same bars.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

use super::provider::{BarSupplier, DataError, Timeframe};
use crate::domain::Bar;

/// Upper bound on generated bars per request; open-ended ranges stop here.
pub const MAX_SYNTHETIC_BARS: usize = 100_000;

/// Generate one bar per `timeframe` step in `[start, end]`, at most
/// [`MAX_SYNTHETIC_BARS`].
pub fn synthetic_bars(
    symbol: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    timeframe: Timeframe,
) -> Vec<Bar> {
    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let step = timeframe.duration();
    let mut bars = Vec::new();
    let mut price = 100.0_f64;
    let mut current = start;

    while current <= end && bars.len() < MAX_SYNTHETIC_BARS {
        let change: f64 = rng.gen_range(-0.02..0.02);
        let open = price;
        let close = price * (1.0 + change);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(100.0..1_100.0);

        bars.push(Bar::new(current, symbol, open, high, low, close, volume));

        price = close;
        current = match current.checked_add_signed(step) {
            Some(next) => next,
            None => return bars,
        };
    }

    if current <= end {
        warn!(
            symbol,
            timeframe = %timeframe,
            cap = MAX_SYNTHETIC_BARS,
            next = %current,
            end = %end,
            "synthetic range truncated"
        );
    }
    bars
}

/// Supplier that answers every request with [`synthetic_bars`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticSource;

impl BarSupplier for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn get_historical_bars(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        timeframe: Timeframe,
    ) -> Result<Vec<Bar>, DataError> {
        Ok(synthetic_bars(symbol, start, end, timeframe))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn range() -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn one_bar_per_step_inclusive() {
        let (start, end) = range();
        let bars = synthetic_bars("BTCUSDT", start, end, Timeframe::Day1);
        assert_eq!(bars.len(), 31);
        assert_eq!(bars[0].timestamp, start);
        assert_eq!(bars[30].timestamp, end);
    }

    #[test]
    fn deterministic_per_symbol() {
        let (start, end) = range();
        let a = synthetic_bars("BTCUSDT", start, end, Timeframe::Day1);
        let b = synthetic_bars("BTCUSDT", start, end, Timeframe::Day1);
        let c = synthetic_bars("ETHUSDT", start, end, Timeframe::Day1);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn bars_are_sane() {
        let (start, end) = range();
        for bar in synthetic_bars("SPY", start, end, Timeframe::Hour4) {
            assert!(bar.is_sane(), "insane bar: {bar:?}");
        }
    }

    #[test]
    fn empty_when_start_after_end() {
        let (start, end) = range();
        assert!(synthetic_bars("SPY", end, start, Timeframe::Day1).is_empty());
    }

    #[test]
    fn open_ended_range_is_capped() {
        let (start, _) = range();
        let bars = synthetic_bars("SPY", start, DateTime::<Utc>::MAX_UTC, Timeframe::Week1);
        assert_eq!(bars.len(), MAX_SYNTHETIC_BARS);
    }

    #[test]
    fn minute_bars_over_a_year_stop_at_cap() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();
        let bars = synthetic_bars("BTCUSDT", start, end, Timeframe::Minute1);
        assert_eq!(bars.len(), MAX_SYNTHETIC_BARS);
        let last = bars.last().unwrap().timestamp;
        assert_eq!(last, start + chrono::Duration::minutes(MAX_SYNTHETIC_BARS as i64 - 1));
        assert!(last < end);
    }
}
