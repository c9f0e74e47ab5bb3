use std::fmt;

use clap::ValueEnum;
use serde::Deserialize;
use uuid::Uuid;

use crate::types::{instrument::Instrument, price::Price};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Buy,
    Sell,
}

impl Side {
    pub fn sign(self) -> i64 {
        match self {
            Side::Buy => 1,
            Side::Sell => -1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum TimeInForce {
    #[default]
    Day,
}

/// A child market order released by the scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderIntent {
    pub order_id: String,
    pub instrument: Instrument,
    pub side: Side,
    pub quantity: u64,
    pub time_in_force: TimeInForce,
    /// Last market trade seen when the intent was created.
    pub arrival_price: Option<Price>,
}

impl OrderIntent {
    pub fn day_market(
        instrument: &Instrument,
        side: Side,
        quantity: u64,
        arrival_price: Option<Price>,
    ) -> Self {
        Self {
            order_id: Uuid::new_v4().to_string(),
            instrument: instrument.clone(),
            side,
            quantity,
            time_in_force: TimeInForce::Day,
            arrival_price,
        }
    }
}
