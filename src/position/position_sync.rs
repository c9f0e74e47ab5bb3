use tokio::sync::watch;
use tracing::info;

use crate::execution::execution_report::ExecutionReport;
use crate::scheduling::execution_state::ExecutionState;
use crate::types::instrument::Instrument;
use crate::types::position::PositionRecord;

/// Refreshes own quantity and price from the authoritative position on every fill, rather
/// than accumulating fills locally.
#[derive(Debug)]
pub struct PositionSync {
    instrument: Instrument,
    positions: watch::Receiver<PositionRecord>,
}

impl PositionSync {
    pub fn new(instrument: Instrument, positions: watch::Receiver<PositionRecord>) -> Self {
        Self {
            instrument,
            positions,
        }
    }

    /// Copies the latest authoritative position into `state`.
    pub fn refresh(&mut self, state: &mut ExecutionState) -> PositionRecord {
        let position = *self.positions.borrow_and_update();
        state.own_filled_quantity = position.quantity;
        state.own_average_price = position.open_average_price;

        position
    }

    /// Returns whether `state` was refreshed.
    pub fn on_fill(&mut self, report: &ExecutionReport, state: &mut ExecutionState) -> bool {
        if !report.is_fill() || report.instrument() != &self.instrument {
            return false;
        }

        let position = self.refresh(state);
        info!(
            instrument = %self.instrument,
            quantity = position.quantity,
            average_price = position.open_average_price,
            market_vwap = state.market_vwap.price().map(|price| price.as_f64()),
            "position refreshed after fill"
        );

        true
    }
}
