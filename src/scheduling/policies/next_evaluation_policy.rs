use crate::scheduling::{
    policy_chain::SchedulePolicy, schedule_context::ScheduleContext, types::SkipReason,
};

/// Holds off until the randomized next-evaluation time recorded in the execution state.
pub struct NextEvaluationPolicy;

impl SchedulePolicy for NextEvaluationPolicy {
    fn should_evaluate(&mut self, ctx: &ScheduleContext<'_>) -> Option<SkipReason> {
        let next = ctx.state.next_evaluation_ms;
        if ctx.now_ms < next {
            return Some(SkipReason::TooSoon {
                remaining_ms: next - ctx.now_ms,
            });
        }

        None
    }
}
