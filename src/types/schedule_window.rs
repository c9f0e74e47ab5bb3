use std::fmt;

use anyhow::{Result, bail};

use crate::types::time_of_day::TimeOfDay;

/// The part of the session an order is worked in. `start` is inclusive, `end` exclusive
/// for trading, but the trajectory covers both endpoints.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScheduleWindow {
    start: TimeOfDay,
    end: TimeOfDay,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WindowPhase {
    BeforeWindow,
    InWindow,
    AfterWindow,
}

impl ScheduleWindow {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Result<Self> {
        if end <= start {
            bail!("schedule window end {end} must be after start {start}");
        }

        Ok(Self { start, end })
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    pub fn phase(&self, now: TimeOfDay) -> WindowPhase {
        if now < self.start {
            WindowPhase::BeforeWindow
        } else if now >= self.end {
            WindowPhase::AfterWindow
        } else {
            WindowPhase::InWindow
        }
    }

    /// Number of trajectory points, one per minute with both ends included.
    pub fn trajectory_len(&self) -> usize {
        (self.end.minutes() - self.start.minutes()) as usize + 1
    }

    /// Trajectory index for `now`, shifted one minute ahead so the scheduler targets the
    /// minute that is about to elapse.
    pub fn minute_bucket(&self, now: TimeOfDay) -> Option<usize> {
        now.minutes_since(self.start)
            .map(|elapsed| elapsed as usize + 1)
    }
}

impl fmt::Display for ScheduleWindow {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: &str, end: &str) -> ScheduleWindow {
        ScheduleWindow::new(start.parse().unwrap(), end.parse().unwrap()).unwrap()
    }

    #[test]
    fn rejects_empty_or_inverted_window() {
        let ten: TimeOfDay = "10:00".parse().unwrap();

        assert!(ScheduleWindow::new(ten, ten).is_err());
        assert!(ScheduleWindow::new(ten, "09:59".parse().unwrap()).is_err());
    }

    #[test]
    fn phase_follows_half_open_interval() {
        let window = window("10:00", "10:10");

        assert_eq!(window.phase("09:59".parse().unwrap()), WindowPhase::BeforeWindow);
        assert_eq!(window.phase("10:00".parse().unwrap()), WindowPhase::InWindow);
        assert_eq!(window.phase("10:09".parse().unwrap()), WindowPhase::InWindow);
        assert_eq!(window.phase("10:10".parse().unwrap()), WindowPhase::AfterWindow);
    }

    #[test]
    fn bucket_points_at_upcoming_minute() {
        let window = window("10:00", "10:10");

        assert_eq!(window.trajectory_len(), 11);
        assert_eq!(window.minute_bucket("10:00".parse().unwrap()), Some(1));
        assert_eq!(window.minute_bucket("10:09".parse().unwrap()), Some(10));
        assert_eq!(window.minute_bucket("09:59".parse().unwrap()), None);
    }
}
