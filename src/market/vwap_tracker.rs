use tracing::debug;

use crate::types::price::Price;

/// Running volume-weighted average of market trades.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VwapTracker {
    price: f64,
    quantity: f64,
}

impl VwapTracker {
    /// Folds one trade in. Returns `false` and leaves the average untouched for trades with a
    /// non-positive or non-finite price or size.
    pub fn on_trade(&mut self, price: f64, size: f64) -> bool {
        let valid = |value: f64| value.is_finite() && value > 0.0;
        if !valid(price) || !valid(size) {
            return false;
        }

        let quantity = self.quantity + size;
        self.price = if self.quantity == 0.0 {
            price
        } else {
            (self.price * self.quantity + price * size) / quantity
        };
        self.quantity = quantity;

        debug!(vwap = self.price, volume = self.quantity, "market vwap updated");

        true
    }

    /// `None` until the first trade.
    pub fn price(&self) -> Option<Price> {
        Price::try_new(self.price)
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }
}
