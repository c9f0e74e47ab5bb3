use crate::scheduling::execution_state::ExecutionState;
use crate::types::time_of_day::TimeOfDay;

pub struct ScheduleContext<'a> {
    pub now_ms: i64,
    pub time_of_day: TimeOfDay,
    pub state: &'a ExecutionState,
}
