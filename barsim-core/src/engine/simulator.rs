//! Execution simulator: signal + bar → portfolio mutation.
//!
//! Sizing is fixed. A BUY invests 90% of cash; a SELL liquidates the whole
//! position. Fills are instant and complete at the bar's close. A signal that
//! cannot be acted on is skipped without error and without an order.

use tracing::debug;

use crate::domain::{
    Bar, IdGen, Order, OrderSide, Portfolio, Signal, SignalKind, COMMISSION_KEY,
};

/// Fraction of available cash committed by a BUY.
pub const INVEST_FRACTION: f64 = 0.9;

/// Why a signal produced no order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SkipReason {
    Hold,
    /// BUY sized to zero or fewer units.
    InsufficientCash,
    /// SELL with nothing held in the signal's symbol.
    NoPosition,
    /// Bar close unusable for the side: BUY needs it positive, SELL non-negative; both finite.
    InvalidPrice,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    Executed(Order),
    Skipped(SkipReason),
}

impl ExecutionOutcome {
    pub fn order(&self) -> Option<&Order> {
        match self {
            Self::Executed(order) => Some(order),
            Self::Skipped(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutionSimulator {
    commission_rate: f64,
    use_fractional_shares: bool,
}

impl ExecutionSimulator {
    pub fn new(commission_rate: f64, use_fractional_shares: bool) -> Self {
        Self {
            commission_rate,
            use_fractional_shares,
        }
    }

    /// Act on `signal` at `bar.close`, mutating `portfolio` on success.
    ///
    /// Orders take the signal's symbol and timestamp.
    pub fn execute(
        &self,
        signal: &Signal,
        bar: &Bar,
        portfolio: &mut Portfolio,
        ids: &mut IdGen,
    ) -> ExecutionOutcome {
        let outcome = match signal.kind {
            SignalKind::Hold => ExecutionOutcome::Skipped(SkipReason::Hold),
            // A buy divides by the price; a sell only needs a finite one.
            SignalKind::Buy if !(bar.close.is_finite() && bar.close > 0.0) => {
                ExecutionOutcome::Skipped(SkipReason::InvalidPrice)
            }
            SignalKind::Sell if !(bar.close.is_finite() && bar.close >= 0.0) => {
                ExecutionOutcome::Skipped(SkipReason::InvalidPrice)
            }
            SignalKind::Buy => self.buy(signal, bar.close, portfolio, ids),
            SignalKind::Sell => self.sell(signal, bar.close, portfolio, ids),
        };

        match &outcome {
            ExecutionOutcome::Executed(order) => debug!(
                id = %order.id,
                side = %order.side,
                quantity = order.quantity,
                price = order.price,
                cash = portfolio.cash,
                "order filled"
            ),
            ExecutionOutcome::Skipped(reason) => debug!(
                kind = %signal.kind,
                reason = ?reason,
                timestamp = %signal.timestamp,
                "signal skipped"
            ),
        }
        outcome
    }

    fn buy(&self, signal: &Signal, price: f64, portfolio: &mut Portfolio, ids: &mut IdGen) -> ExecutionOutcome {
        let invest = portfolio.cash * INVEST_FRACTION;
        let mut quantity = invest / price;
        if !self.use_fractional_shares {
            quantity = quantity.floor();
        }
        if quantity <= 0.0 || !quantity.is_finite() {
            return ExecutionOutcome::Skipped(SkipReason::InsufficientCash);
        }

        // Charged on the pre-floor amount, not the filled notional.
        let commission = invest * self.commission_rate;
        portfolio.cash -= quantity * price + commission;
        *portfolio.positions.entry(signal.symbol.clone()).or_insert(0.0) += quantity;

        ExecutionOutcome::Executed(self.record(signal, OrderSide::Buy, quantity, price, commission, ids))
    }

    fn sell(&self, signal: &Signal, price: f64, portfolio: &mut Portfolio, ids: &mut IdGen) -> ExecutionOutcome {
        let quantity = portfolio.position(&signal.symbol);
        if quantity <= 0.0 {
            return ExecutionOutcome::Skipped(SkipReason::NoPosition);
        }

        let commission = quantity * price * self.commission_rate;
        portfolio.cash += quantity * price - commission;
        portfolio.positions.insert(signal.symbol.clone(), 0.0);

        ExecutionOutcome::Executed(self.record(signal, OrderSide::Sell, quantity, price, commission, ids))
    }

    fn record(
        &self,
        signal: &Signal,
        side: OrderSide,
        quantity: f64,
        price: f64,
        commission: f64,
        ids: &mut IdGen,
    ) -> Order {
        let mut order = Order::filled_market(
            ids.next_order_id(),
            signal.symbol.clone(),
            signal.timestamp,
            side,
            quantity,
            price,
        );
        order
            .metadata
            .insert(COMMISSION_KEY.to_string(), commission.to_string());
        order
    }
}
