use std::fmt;

use crate::types::instrument::Instrument;

#[derive(Debug, Clone)]
pub enum MarketEvent {
    Bid {
        instrument: Instrument,
        price: f64,
        size: f64,
        timestamp_ms: u64,
    },
    Ask {
        instrument: Instrument,
        price: f64,
        size: f64,
        timestamp_ms: u64,
    },
    Volume {
        instrument: Instrument,
        size: f64,
        timestamp_ms: u64,
    },
    Trade {
        instrument: Instrument,
        price: f64,
        size: f64,
        timestamp_ms: u64,
    },
}

impl MarketEvent {
    pub fn instrument(&self) -> &Instrument {
        match self {
            Self::Bid { instrument, .. }
            | Self::Ask { instrument, .. }
            | Self::Volume { instrument, .. }
            | Self::Trade { instrument, .. } => instrument,
        }
    }

    pub fn timestamp_ms(&self) -> u64 {
        match self {
            Self::Bid { timestamp_ms, .. }
            | Self::Ask { timestamp_ms, .. }
            | Self::Volume { timestamp_ms, .. }
            | Self::Trade { timestamp_ms, .. } => *timestamp_ms,
        }
    }
}

impl fmt::Display for MarketEvent {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bid { price, size, .. } => write!(formatter, "bid {size}@{price}"),
            Self::Ask { price, size, .. } => write!(formatter, "ask {size}@{price}"),
            Self::Volume { size, .. } => write!(formatter, "volume {size}"),
            Self::Trade { price, size, .. } => write!(formatter, "trade {size}@{price}"),
        }
    }
}
