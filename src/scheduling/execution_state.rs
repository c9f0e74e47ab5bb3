use crate::market::vwap_tracker::VwapTracker;
use crate::types::price::Price;

/// Live quantities for one working order.
#[derive(Debug, Clone, Default)]
pub struct ExecutionState {
    /// Signed, as reported by the position source.
    pub own_filled_quantity: i64,
    pub own_average_price: f64,
    pub market_vwap: VwapTracker,
    pub last_trade_price: Option<Price>,
    /// Epoch millis before which no new scheduling decision is made.
    pub next_evaluation_ms: i64,
}
