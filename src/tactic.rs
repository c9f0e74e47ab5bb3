use chrono::{DateTime, Utc};

use crate::events::MarketEvent;
use crate::execution::execution_report::ExecutionReport;
use crate::scheduling::types::ScheduleDecision;

/// What a hosting event loop needs from an execution tactic. Both calls are made serially
/// from one task. The host submits whatever intent the decision carries.
pub trait ExecutionTactic {
    fn on_market_update(&mut self, event: &MarketEvent, now: DateTime<Utc>) -> ScheduleDecision;
    fn on_fill_notification(&mut self, report: &ExecutionReport);
}
