use crate::scheduling::{
    policy_chain::SchedulePolicy, schedule_context::ScheduleContext, types::SkipReason,
};
use crate::types::schedule_window::{ScheduleWindow, WindowPhase};

/// Drops every update outside the schedule window, before any bookkeeping.
pub struct TradingWindowPolicy {
    pub window: ScheduleWindow,
}

impl TradingWindowPolicy {
    pub fn new(window: ScheduleWindow) -> Self {
        Self { window }
    }
}

impl SchedulePolicy for TradingWindowPolicy {
    fn should_evaluate(&mut self, ctx: &ScheduleContext<'_>) -> Option<SkipReason> {
        match self.window.phase(ctx.time_of_day) {
            WindowPhase::InWindow => None,
            phase => Some(SkipReason::OutsideWindow { phase }),
        }
    }
}
