use anyhow::{Result, bail};

use crate::execution::order_intent::Side;
use crate::types::instrument::Instrument;

#[derive(Debug, Clone, PartialEq)]
pub struct OrderParams {
    instrument: Instrument,
    side: Side,
    total_quantity: u64,
    aggression: f64,
}

impl OrderParams {
    pub fn new(instrument: Instrument, side: Side, total_quantity: u64, aggression: f64) -> Result<Self> {
        if total_quantity == 0 {
            bail!("order quantity must be > 0");
        }
        if i64::try_from(total_quantity).is_err() {
            bail!("order quantity {total_quantity} is too large");
        }
        if !aggression.is_finite() || aggression < 0.0 {
            bail!("aggression must be finite and >= 0, got {aggression}");
        }

        Ok(Self {
            instrument,
            side,
            total_quantity,
            aggression,
        })
    }

    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn total_quantity(&self) -> u64 {
        self.total_quantity
    }

    pub fn aggression(&self) -> f64 {
        self.aggression
    }

    /// Total quantity with the side folded in: negative for sells.
    pub fn signed_quantity(&self) -> i64 {
        self.side.sign() * self.total_quantity as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spy() -> Instrument {
        Instrument::new("SPY", "USD")
    }

    #[test]
    fn sells_are_signed_negative() {
        let buy = OrderParams::new(spy(), Side::Buy, 100, 0.1).unwrap();
        let sell = OrderParams::new(spy(), Side::Sell, 100, 0.1).unwrap();

        assert_eq!(buy.signed_quantity(), 100);
        assert_eq!(sell.signed_quantity(), -100);
    }

    #[test]
    fn validates_quantity_and_aggression() {
        assert!(OrderParams::new(spy(), Side::Buy, 0, 0.1).is_err());
        assert!(OrderParams::new(spy(), Side::Buy, 10, -0.1).is_err());
        assert!(OrderParams::new(spy(), Side::Buy, 10, f64::INFINITY).is_err());
        assert!(OrderParams::new(spy(), Side::Buy, 10, 0.0).is_ok());
    }
}
