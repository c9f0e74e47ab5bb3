use crate::scheduling::{schedule_context::ScheduleContext, types::SkipReason};

pub trait SchedulePolicy {
    fn should_evaluate(&mut self, ctx: &ScheduleContext<'_>) -> Option<SkipReason>;
}

/// Runs policies in order and stops at the first one that vetoes.
pub struct PolicyChain {
    policies: Vec<Box<dyn SchedulePolicy + Send>>,
}

impl PolicyChain {
    pub fn new(policies: Vec<Box<dyn SchedulePolicy + Send>>) -> Self {
        Self { policies }
    }

    pub fn check(&mut self, context: &ScheduleContext<'_>) -> Option<SkipReason> {
        self.policies
            .iter_mut()
            .find_map(|policy| policy.should_evaluate(context))
    }
}
