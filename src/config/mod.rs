pub mod watcher;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;

use crate::execution::order_intent::Side;
use crate::scheduling::reevaluation_interval::{DEFAULT_MAX_MS, DEFAULT_MIN_MS};
use crate::types::instrument::Instrument;
use crate::types::order_params::OrderParams;
use crate::types::schedule_window::ScheduleWindow;
use crate::types::time_of_day::TimeOfDay;

/// Minutes from start-up until a defaulted window opens.
const DEFAULT_START_DELAY_MINUTES: u32 = 2;
const DEFAULT_WINDOW_MINUTES: u32 = 10;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfig {
    pub order: OrderSection,
    pub curve: CurveSection,
    #[serde(default)]
    pub window: Option<WindowSection>,
    #[serde(default)]
    pub session: SessionSection,
    #[serde(default)]
    pub throttle: ThrottleSection,
    #[serde(default)]
    pub plot: PlotSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderSection {
    /// `SYMBOL/CCY`
    pub instrument: String,
    pub side: Side,
    pub quantity: u64,
    #[serde(default = "default_aggression")]
    pub aggression: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CurveSection {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowSection {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionSection {
    pub open: TimeOfDay,
    /// Exchange offset from UTC.
    pub utc_offset_minutes: i32,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            open: TimeOfDay::US_EQUITIES_OPEN,
            utc_offset_minutes: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThrottleSection {
    /// Never below 3000; shorter gaps are rejected.
    pub min_interval_ms: u64,
    pub max_interval_ms: u64,
}

impl Default for ThrottleSection {
    fn default() -> Self {
        Self {
            min_interval_ms: DEFAULT_MIN_MS,
            max_interval_ms: DEFAULT_MAX_MS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotSection {
    pub enabled: bool,
    pub dir: PathBuf,
}

impl Default for PlotSection {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: PathBuf::from("."),
        }
    }
}

fn default_aggression() -> f64 {
    0.1
}

impl SchedulerConfig {
    pub const DEFAULT_FILE: &'static str = "vwap_order.yml";

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read scheduler config {}", path.display()))?;

        Self::from_yaml(&raw)
            .with_context(|| format!("failed to load scheduler config {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        let config: SchedulerConfig =
            serde_yaml::from_str(raw).context("failed to parse scheduler config")?;

        config
            .validate()
            .context("scheduler config validation failed")?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.order_params()?;

        if let Some(window) = self.window {
            ScheduleWindow::new(window.start, window.end)?;
        }

        self.utc_offset()?;

        if self.throttle.min_interval_ms < DEFAULT_MIN_MS {
            bail!(
                "throttle.min_interval_ms ({}) must be at least {DEFAULT_MIN_MS}",
                self.throttle.min_interval_ms
            );
        }

        if self.throttle.min_interval_ms > self.throttle.max_interval_ms {
            bail!(
                "throttle.min_interval_ms ({}) must not exceed throttle.max_interval_ms ({})",
                self.throttle.min_interval_ms,
                self.throttle.max_interval_ms
            );
        }

        Ok(())
    }

    /// Applies command line overrides and re-validates.
    pub fn with_overrides(
        mut self,
        side: Option<Side>,
        quantity: Option<u64>,
        aggression: Option<f64>,
        plot: bool,
    ) -> Result<Self> {
        if let Some(side) = side {
            self.order.side = side;
        }
        if let Some(quantity) = quantity {
            self.order.quantity = quantity;
        }
        if let Some(aggression) = aggression {
            self.order.aggression = aggression;
        }
        self.plot.enabled |= plot;

        self.validate().context("invalid command line overrides")?;

        Ok(self)
    }

    pub fn instrument(&self) -> Result<Instrument> {
        self.order
            .instrument
            .parse()
            .with_context(|| format!("invalid order.instrument \"{}\"", self.order.instrument))
    }

    pub fn order_params(&self) -> Result<OrderParams> {
        OrderParams::new(
            self.instrument()?,
            self.order.side,
            self.order.quantity,
            self.order.aggression,
        )
        .context("invalid order section")
    }

    pub fn utc_offset(&self) -> Result<FixedOffset> {
        let minutes = self.session.utc_offset_minutes;

        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .with_context(|| format!("session.utc_offset_minutes {minutes} is out of range"))
    }

    /// The configured window, or one opening shortly after `now` when none is set.
    pub fn schedule_window(&self, now: DateTime<Utc>) -> Result<ScheduleWindow> {
        if let Some(window) = self.window {
            return ScheduleWindow::new(window.start, window.end);
        }

        let start = TimeOfDay::at(now, self.utc_offset()?)
            .plus_minutes(DEFAULT_START_DELAY_MINUTES)
            .context("default window would start after midnight")?;
        let end = start
            .plus_minutes(DEFAULT_WINDOW_MINUTES)
            .context("default window would end after midnight")?;

        ScheduleWindow::new(start, end)
    }

    /// The configured window, or `resolved` when none is set.
    pub fn schedule_window_or(&self, resolved: ScheduleWindow) -> Result<ScheduleWindow> {
        match self.window {
            Some(window) => ScheduleWindow::new(window.start, window.end),
            None => Ok(resolved),
        }
    }
}
