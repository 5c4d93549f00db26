//! Strategy registry: name → factory.
//!
//! The registry is an ordinary value owned by the caller. Each `create` call
//! builds a fresh instance, which is what parallel runs need.

use std::collections::BTreeMap;
use std::fmt;

use super::{BuyAndHold, MaCrossover, SignalSource, StrategyError};

/// Numeric strategy parameters keyed by name.
pub type StrategyParams = BTreeMap<String, f64>;

/// Largest lookback a config may request.
pub const MAX_PERIOD: usize = 100_000;

pub type StrategyFactory =
    Box<dyn Fn(&StrategyParams) -> Result<Box<dyn SignalSource>, StrategyError> + Send + Sync>;

#[derive(Default)]
pub struct StrategyRegistry {
    factories: BTreeMap<String, StrategyFactory>,
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("names", &self.names())
            .finish()
    }
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every shipped strategy.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(MaCrossover::NAME, |params| {
            let fast = param_period(params, MaCrossover::NAME, "fast_period", 5)?;
            let slow = param_period(params, MaCrossover::NAME, "slow_period", 20)?;
            Ok(Box::new(MaCrossover::new(fast, slow)?) as Box<dyn SignalSource>)
        });
        registry.register(BuyAndHold::NAME, |_| {
            Ok(Box::new(BuyAndHold::new()) as Box<dyn SignalSource>)
        });
        registry
    }

    /// Register (or replace) a factory under `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&StrategyParams) -> Result<Box<dyn SignalSource>, StrategyError>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
        self
    }

    pub fn create(
        &self,
        name: &str,
        params: &StrategyParams,
    ) -> Result<Box<dyn SignalSource>, StrategyError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| StrategyError::UnknownStrategy(name.to_string()))?;
        factory(params)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }
}

/// Extract a whole period in `1..=MAX_PERIOD`, falling back to `default`.
fn param_period(
    params: &StrategyParams,
    strategy: &str,
    name: &str,
    default: usize,
) -> Result<usize, StrategyError> {
    let Some(&raw) = params.get(name) else {
        return Ok(default);
    };
    if !raw.is_finite() || raw < 1.0 || raw > MAX_PERIOD as f64 || raw.fract() != 0.0 {
        return Err(StrategyError::InvalidParameter {
            strategy: strategy.to_string(),
            name: name.to_string(),
            reason: format!("expected a whole number in 1..={MAX_PERIOD}, got {raw}"),
        });
    }
    Ok(raw as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, f64)]) -> StrategyParams {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn param_period_rejects_fractions_and_zero() {
        assert!(param_period(&params(&[("p", 2.5)]), "s", "p", 3).is_err());
        assert!(param_period(&params(&[("p", 0.0)]), "s", "p", 3).is_err());
        assert!(param_period(&params(&[("p", f64::NAN)]), "s", "p", 3).is_err());
        assert_eq!(param_period(&params(&[("p", 7.0)]), "s", "p", 3), Ok(7));
        assert_eq!(param_period(&StrategyParams::new(), "s", "p", 3), Ok(3));
    }

    #[test]
    fn builtins_are_listed_sorted() {
        let registry = StrategyRegistry::with_builtins();
        assert_eq!(registry.names(), vec!["buy_and_hold", "ma_crossover"]);
        assert!(registry.contains("ma_crossover"));
    }

    #[test]
    fn create_ma_crossover_with_defaults() {
        let registry = StrategyRegistry::with_builtins();
        let s = registry.create("ma_crossover", &StrategyParams::new()).unwrap();
        assert_eq!(s.name(), "ma_crossover");
        assert_eq!(s.parameters()["fast_period"], "5");
        assert_eq!(s.parameters()["slow_period"], "20");
    }

    #[test]
    fn create_ma_crossover_with_params() {
        let registry = StrategyRegistry::with_builtins();
        let s = registry
            .create("ma_crossover", &params(&[("fast_period", 3.0), ("slow_period", 8.0)]))
            .unwrap();
        assert_eq!(s.parameters()["fast_period"], "3");
        assert_eq!(s.parameters()["slow_period"], "8");
    }

    #[test]
    fn unknown_strategy_errors() {
        let registry = StrategyRegistry::with_builtins();
        let err = registry.create("nope", &StrategyParams::new()).err().unwrap();
        assert_eq!(err, StrategyError::UnknownStrategy("nope".into()));
    }

    #[test]
    fn bad_period_surfaces_invalid_parameter() {
        let registry = StrategyRegistry::with_builtins();
        let err = registry
            .create("ma_crossover", &params(&[("slow_period", -4.0)]))
            .err()
            .unwrap();
        assert!(matches!(err, StrategyError::InvalidParameter { ref name, .. } if name == "slow_period"));
    }

    #[test]
    fn huge_period_is_rejected_before_building() {
        let registry = StrategyRegistry::with_builtins();
        let err = registry
            .create("ma_crossover", &params(&[("slow_period", 1e15)]))
            .err()
            .unwrap();
        assert!(matches!(err, StrategyError::InvalidParameter { ref name, .. } if name == "slow_period"));

        assert!(param_period(&params(&[("p", MAX_PERIOD as f64)]), "s", "p", 3).is_ok());
        assert!(param_period(&params(&[("p", MAX_PERIOD as f64 + 1.0)]), "s", "p", 3).is_err());
        assert!(param_period(&params(&[("p", u64::MAX as f64)]), "s", "p", 3).is_err());
    }

    #[test]
    fn custom_factories_can_be_registered() {
        let mut registry = StrategyRegistry::new();
        registry.register("hold_forever", |_| {
            Ok(Box::new(crate::strategy::ScriptedSignals::new(Vec::new())) as Box<dyn SignalSource>)
        });
        assert_eq!(registry.names(), vec!["hold_forever"]);
        assert!(registry.create("hold_forever", &StrategyParams::new()).is_ok());
    }
}
