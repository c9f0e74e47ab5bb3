use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, FixedOffset, NaiveTime, Timelike, Utc};
use serde::Deserialize;

/// Wall-clock time of day at minute resolution, stored as minutes since midnight.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    pub const MINUTES_PER_DAY: u32 = 24 * 60;

    /// Regular US equities open.
    pub const US_EQUITIES_OPEN: TimeOfDay = TimeOfDay(9 * 60 + 30);

    pub fn from_minutes(minutes: u32) -> Result<Self> {
        if minutes >= Self::MINUTES_PER_DAY {
            bail!("time of day out of range: {minutes} minutes since midnight");
        }

        Ok(Self(minutes))
    }

    pub fn from_hm(hour: u32, minute: u32) -> Result<Self> {
        if minute >= 60 {
            bail!("invalid minute {minute}");
        }

        Self::from_minutes(hour * 60 + minute)
    }

    /// Local time of day for `now` at the given exchange offset.
    pub fn at(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let local = now.with_timezone(&offset);

        Self(local.hour() * 60 + local.minute())
    }

    pub fn minutes(self) -> u32 {
        self.0
    }

    pub fn plus_minutes(self, minutes: u32) -> Result<Self> {
        Self::from_minutes(self.0 + minutes)
    }

    /// Minutes from `earlier` to `self`, `None` when `earlier` is later.
    pub fn minutes_since(self, earlier: TimeOfDay) -> Option<u32> {
        self.0.checked_sub(earlier.0)
    }
}

impl FromStr for TimeOfDay {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let value = value.trim();
        let time = NaiveTime::parse_from_str(value, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
            .with_context(|| format!("invalid time of day \"{value}\", expected HH:MM"))?;

        Self::from_hm(time.hour(), time.minute())
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl fmt::Debug for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeOfDay({})", self)
    }
}
