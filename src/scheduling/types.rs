use std::fmt;

use crate::curve::trajectory::TrajectoryPoint;
use crate::execution::order_intent::OrderIntent;
use crate::types::schedule_window::WindowPhase;

#[derive(Debug, Clone)]
pub enum ScheduleDecision {
    Evaluated(Evaluation),
    Skip(SkipReason),
}

impl ScheduleDecision {
    pub fn into_intent(self) -> Option<OrderIntent> {
        match self {
            Self::Evaluated(evaluation) => evaluation.intent,
            Self::Skip(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Evaluation {
    pub minute_bucket: usize,
    pub point: TrajectoryPoint,
    /// Own filled quantity over total order quantity, same sign convention on both.
    pub completed_fraction: f64,
    pub target_quantity: i64,
    pub shortfall: i64,
    pub next_evaluation_ms: i64,
    pub intent: Option<OrderIntent>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkipReason {
    OutsideWindow { phase: WindowPhase },
    NotATrade,
    RejectedTick,
    TooSoon { remaining_ms: i64 },
    MissingBucket { bucket: Option<usize>, len: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutsideWindow { phase } => write!(formatter, "outside window ({phase:?})"),
            Self::NotATrade => write!(formatter, "not a trade"),
            Self::RejectedTick => write!(formatter, "rejected tick"),
            Self::TooSoon { remaining_ms } => write!(formatter, "too soon ({remaining_ms}ms left)"),
            Self::MissingBucket {
                bucket: Some(bucket),
                len,
            } => write!(formatter, "bucket {bucket} outside trajectory of {len}"),
            Self::MissingBucket { bucket: None, len } => {
                write!(formatter, "no bucket for trajectory of {len}")
            }
        }
    }
}
