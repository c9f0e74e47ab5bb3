use std::fmt;

use crate::execution::order_intent::Side;
use crate::types::instrument::Instrument;
use crate::types::price::Price;

#[derive(Debug, Clone)]
pub enum ExecutionReport {
    Submitted {
        order_id: String,
        instrument: Instrument,
        side: Side,
        quantity: u64,
    },

    Rejected {
        order_id: String,
        instrument: Instrument,
        side: Side,
        reason: String,
    },

    Filled {
        order_id: String,
        instrument: Instrument,
        side: Side,
        price: Price,
        quantity: u64,
        cum_quantity: u64,
    },
}

impl ExecutionReport {
    pub fn is_fill(&self) -> bool {
        matches!(self, Self::Filled { .. })
    }

    pub fn instrument(&self) -> &Instrument {
        match self {
            Self::Submitted { instrument, .. }
            | Self::Rejected { instrument, .. }
            | Self::Filled { instrument, .. } => instrument,
        }
    }
}

impl fmt::Display for ExecutionReport {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Submitted {
                order_id,
                instrument,
                side,
                quantity,
            } => write!(formatter, "submitted {order_id} {side} {quantity} {instrument}"),
            Self::Rejected {
                order_id,
                instrument,
                side,
                reason,
            } => write!(formatter, "rejected {order_id} {side} {instrument}: {reason}"),
            Self::Filled {
                order_id,
                instrument,
                side,
                price,
                quantity,
                cum_quantity,
            } => write!(
                formatter,
                "filled {order_id} {side} {quantity} {instrument} @ {price} (cum {cum_quantity})"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_fill_details() {
        let report = ExecutionReport::Filled {
            order_id: "abc".to_string(),
            instrument: Instrument::new("SPY", "USD"),
            side: Side::Buy,
            price: Price::new(101.5),
            quantity: 40,
            cum_quantity: 40,
        };

        assert!(report.is_fill());
        assert_eq!(report.to_string(), "filled abc BUY 40 SPY/USD @ 101.5000 (cum 40)");
    }

    #[test]
    fn rejection_carries_reason() {
        let report = ExecutionReport::Rejected {
            order_id: "abc".to_string(),
            instrument: Instrument::new("SPY", "USD"),
            side: Side::Sell,
            reason: "dry-run reject".to_string(),
        };

        assert!(!report.is_fill());
        assert_eq!(report.to_string(), "rejected abc SELL SPY/USD: dry-run reject");
    }
}
