//! Streaming simple moving average over close prices.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    window: VecDeque<f64>,
}

impl Sma {
    /// Returns `None` for a zero period.
    pub fn new(period: usize) -> Option<Self> {
        if period == 0 {
            return None;
        }
        Some(Self {
            period,
            window: VecDeque::new(),
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn update(&mut self, value: f64) {
        self.window.push_back(value);
        if self.window.len() > self.period {
            self.window.pop_front();
        }
    }

    /// True once `period` values have been seen.
    pub fn is_ready(&self) -> bool {
        self.window.len() >= self.period
    }

    /// Mean of the window, `None` until ready.
    pub fn value(&self) -> Option<f64> {
        self.is_ready()
            .then(|| self.window.iter().sum::<f64>() / self.window.len() as f64)
    }

    pub fn reset(&mut self) {
        self.window.clear();
    }
}
