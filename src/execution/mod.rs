pub mod dry_run;
pub mod execution_report;
pub mod order_intent;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::execution::execution_report::ExecutionReport;
use crate::execution::order_intent::OrderIntent;
use crate::position::PositionSource;
use crate::types::instrument::Instrument;

pub type ReportSender = broadcast::Sender<ExecutionReport>;

pub type DynamicPositionSource = Box<dyn PositionSource + Send + Sync>;

/// Order transport. Submission is fire-and-forget: outcomes arrive as [`ExecutionReport`]s.
#[async_trait]
pub trait ExecutionVenue {
    async fn submit(&self, intent: &OrderIntent) -> Result<()>;
    async fn spawn_positions(&self, instrument: &Instrument) -> Result<DynamicPositionSource>;
}
