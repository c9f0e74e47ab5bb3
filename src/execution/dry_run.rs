use async_trait::async_trait;
use rand::Rng;
use tokio::sync::watch;

use anyhow::Result;
use tracing::{debug, info};

use crate::{
    execution::{
        DynamicPositionSource, ExecutionVenue, ReportSender, execution_report::ExecutionReport,
        order_intent::OrderIntent,
    },
    position::PositionSource,
    types::{instrument::Instrument, position::PositionRecord},
};

/// Paper venue: every accepted intent fills in full at its arrival price.
#[derive(Debug)]
pub struct DryRunExecutionVenue {
    on_report: ReportSender,
    positions: watch::Sender<PositionRecord>,
    reject_one_in: u32,
}

impl DryRunExecutionVenue {
    pub fn new(on_report: ReportSender) -> Self {
        let (positions, _) = watch::channel(PositionRecord::default());

        Self {
            on_report,
            positions,
            reject_one_in: 10,
        }
    }

    /// Reject roughly one intent in `n` at random; 0 disables random rejects.
    pub fn with_reject_one_in(mut self, n: u32) -> Self {
        self.reject_one_in = n;
        self
    }

    fn emit(&self, report: ExecutionReport) {
        debug!(?report);
        let _ = self.on_report.send(report);
    }

    fn will_reject(&self) -> bool {
        if self.reject_one_in == 0 {
            return false;
        }

        let mut rng = rand::rng();
        rng.random_range(0..self.reject_one_in) == 0
    }

    fn reject(&self, intent: &OrderIntent, reason: &str) {
        self.emit(ExecutionReport::Rejected {
            order_id: intent.order_id.clone(),
            instrument: intent.instrument.clone(),
            side: intent.side,
            reason: reason.to_string(),
        });
    }
}

struct DryRunPositions {
    receiver: watch::Receiver<PositionRecord>,
}

impl PositionSource for DryRunPositions {
    fn subscribe(&self) -> watch::Receiver<PositionRecord> {
        self.receiver.clone()
    }
}

#[async_trait]
impl ExecutionVenue for DryRunExecutionVenue {
    async fn submit(&self, intent: &OrderIntent) -> Result<()> {
        self.emit(ExecutionReport::Submitted {
            order_id: intent.order_id.clone(),
            instrument: intent.instrument.clone(),
            side: intent.side,
            quantity: intent.quantity,
        });

        let Some(price) = intent.arrival_price else {
            self.reject(intent, "no reference price to fill against");
            return Ok(());
        };

        if self.will_reject() {
            self.reject(intent, "rejected");
            return Ok(());
        }

        // position first: fill listeners read it as soon as they see the report
        self.positions.send_modify(|position| {
            *position = position.apply_fill(intent.side, intent.quantity, price.as_f64());
        });

        self.emit(ExecutionReport::Filled {
            order_id: intent.order_id.clone(),
            instrument: intent.instrument.clone(),
            side: intent.side,
            price,
            quantity: intent.quantity,
            cum_quantity: intent.quantity,
        });

        Ok(())
    }

    async fn spawn_positions(&self, instrument: &Instrument) -> Result<DynamicPositionSource> {
        info!(%instrument, "serving dry-run positions");

        Ok(Box::new(DryRunPositions {
            receiver: self.positions.subscribe(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::broadcast;

    use super::*;
    use crate::execution::order_intent::Side;
    use crate::types::price::Price;

    fn spy() -> Instrument {
        Instrument::new("SPY", "USD")
    }

    #[tokio::test]
    async fn fills_update_position_before_report() {
        let (sender, mut reports) = broadcast::channel(16);
        let venue = DryRunExecutionVenue::new(sender).with_reject_one_in(0);
        let positions = venue.spawn_positions(&spy()).await.unwrap().subscribe();

        let intent = OrderIntent::day_market(&spy(), Side::Buy, 20, Some(Price::new(100.0)));
        venue.submit(&intent).await.unwrap();

        assert!(matches!(reports.recv().await.unwrap(), ExecutionReport::Submitted { .. }));
        match reports.recv().await.unwrap() {
            ExecutionReport::Filled { quantity, price, .. } => {
                assert_eq!(quantity, 20);
                assert_eq!(price.as_f64(), 100.0);
            }
            other => panic!("unexpected report {other:?}"),
        }
        assert_eq!(*positions.borrow(), PositionRecord::new(20, 100.0));
    }

    #[tokio::test]
    async fn rejects_without_arrival_price() {
        let (sender, mut reports) = broadcast::channel(16);
        let venue = DryRunExecutionVenue::new(sender).with_reject_one_in(0);
        let positions = venue.spawn_positions(&spy()).await.unwrap().subscribe();

        let intent = OrderIntent::day_market(&spy(), Side::Sell, 5, None);
        venue.submit(&intent).await.unwrap();

        let _submitted = reports.recv().await.unwrap();
        assert!(matches!(reports.recv().await.unwrap(), ExecutionReport::Rejected { .. }));
        assert_eq!(*positions.borrow(), PositionRecord::default());
    }
}
