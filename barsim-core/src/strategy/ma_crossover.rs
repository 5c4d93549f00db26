//! Moving average crossover.
//!
//! BUY when the fast SMA crosses above the slow SMA, SELL when it crosses
//! below. The previous-value state starts at zero, so the first bar on which
//! both averages are ready never produces a cross.

use std::collections::BTreeMap;

use super::{SignalSource, Sma, StrategyError};
use crate::domain::{Bar, Signal};

#[derive(Debug, Clone)]
pub struct MaCrossover {
    fast: Sma,
    slow: Sma,
    prev_fast: f64,
    prev_slow: f64,
}

impl MaCrossover {
    pub const NAME: &'static str = "ma_crossover";

    pub fn new(fast_period: usize, slow_period: usize) -> Result<Self, StrategyError> {
        let fast = Sma::new(fast_period).ok_or_else(|| zero_period("fast_period"))?;
        let slow = Sma::new(slow_period).ok_or_else(|| zero_period("slow_period"))?;
        Ok(Self {
            fast,
            slow,
            prev_fast: 0.0,
            prev_slow: 0.0,
        })
    }
}

fn zero_period(name: &str) -> StrategyError {
    StrategyError::InvalidParameter {
        strategy: MaCrossover::NAME.into(),
        name: name.into(),
        reason: "period must be greater than 0".into(),
    }
}

impl SignalSource for MaCrossover {
    fn initialize(&mut self) {
        self.fast.reset();
        self.slow.reset();
        self.prev_fast = 0.0;
        self.prev_slow = 0.0;
    }

    fn on_data(&mut self, bar: &Bar) -> Option<Signal> {
        self.fast.update(bar.close);
        self.slow.update(bar.close);

        let (fast, slow) = (self.fast.value()?, self.slow.value()?);

        let golden = self.prev_fast < self.prev_slow && fast > slow;
        let death = self.prev_fast > self.prev_slow && fast < slow;

        self.prev_fast = fast;
        self.prev_slow = slow;

        let signal = if golden {
            Signal::buy(bar.timestamp, bar.symbol.clone())
        } else if death {
            Signal::sell(bar.timestamp, bar.symbol.clone())
        } else {
            return None;
        };

        Some(
            signal
                .with_metadata("fast_ma", fast.to_string())
                .with_metadata("slow_ma", slow.to_string()),
        )
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn parameters(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("fast_period".to_string(), self.fast.period().to_string()),
            ("slow_period".to_string(), self.slow.period().to_string()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SignalKind;
    use chrono::{Duration, TimeZone, Utc};

    fn bars(closes: &[f64]) -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(start + Duration::days(i as i64), "BTCUSDT", c, c, c, c, 1.0))
            .collect()
    }

    fn kinds(strategy: &mut MaCrossover, closes: &[f64]) -> Vec<Option<SignalKind>> {
        bars(closes)
            .iter()
            .map(|b| strategy.on_data(b).map(|s| s.kind))
            .collect()
    }

    #[test]
    fn zero_period_is_invalid() {
        assert!(matches!(
            MaCrossover::new(0, 5),
            Err(StrategyError::InvalidParameter { name, .. }) if name == "fast_period"
        ));
        assert!(MaCrossover::new(2, 0).is_err());
    }

    #[test]
    fn first_ready_bar_never_crosses() {
        let mut s = MaCrossover::new(1, 2).unwrap();
        // bar 1: slow not ready. bar 2: fast=12 > slow=11 but prev=(0,0).
        assert_eq!(kinds(&mut s, &[10.0, 12.0]), vec![None, None]);
    }

    #[test]
    fn golden_then_death_cross() {
        let mut s = MaCrossover::new(1, 2).unwrap();
        let out = kinds(&mut s, &[10.0, 8.0, 12.0, 13.0, 9.0]);
        // bar2: fast 8 < slow 9 (prev 0,0 -> no cross)
        // bar3: fast 12 > slow 10, prev 8 < 9 -> BUY
        // bar4: fast 13 > slow 12.5 -> none
        // bar5: fast 9 < slow 11, prev 13 > 12.5 -> SELL
        assert_eq!(
            out,
            vec![None, None, Some(SignalKind::Buy), None, Some(SignalKind::Sell)]
        );
    }

    #[test]
    fn initialize_resets_state() {
        let mut s = MaCrossover::new(1, 2).unwrap();
        let first = kinds(&mut s, &[10.0, 8.0, 12.0]);
        s.initialize();
        let second = kinds(&mut s, &[10.0, 8.0, 12.0]);
        assert_eq!(first, second);
    }

    #[test]
    fn signal_carries_bar_identity_and_metadata() {
        let mut s = MaCrossover::new(1, 2).unwrap();
        let bs = bars(&[10.0, 8.0, 12.0]);
        s.on_data(&bs[0]);
        s.on_data(&bs[1]);
        let signal = s.on_data(&bs[2]).unwrap();
        assert_eq!(signal.timestamp, bs[2].timestamp);
        assert_eq!(signal.symbol, "BTCUSDT");
        assert_eq!(signal.metadata["fast_ma"], "12");
        assert_eq!(signal.metadata["slow_ma"], "10");
    }

    #[test]
    fn parameters_report_periods() {
        let s = MaCrossover::new(5, 20).unwrap();
        let params = s.parameters();
        assert_eq!(params["fast_period"], "5");
        assert_eq!(params["slow_period"], "20");
        assert_eq!(s.name(), "ma_crossover");
    }
}
