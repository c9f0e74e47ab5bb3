use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use rand::Rng;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::curve::curve_loader::CurveLoader;
use crate::curve::observer::TrajectoryObserver;
use crate::curve::trajectory::Trajectory;
use crate::curve::trajectory_builder::TrajectoryBuilder;
use crate::events::MarketEvent;
use crate::execution::execution_report::ExecutionReport;
use crate::execution::order_intent::{OrderIntent, Side};
use crate::position::position_sync::PositionSync;
use crate::scheduling::execution_state::ExecutionState;
use crate::scheduling::policies::next_evaluation_policy::NextEvaluationPolicy;
use crate::scheduling::policies::trading_window_policy::TradingWindowPolicy;
use crate::scheduling::policy_chain::PolicyChain;
use crate::scheduling::reevaluation_interval::ReevaluationInterval;
use crate::scheduling::schedule_context::ScheduleContext;
use crate::scheduling::types::{Evaluation, ScheduleDecision, SkipReason};
use crate::tactic::ExecutionTactic;
use crate::types::order_params::OrderParams;
use crate::types::position::PositionRecord;
use crate::types::price::Price;
use crate::types::schedule_window::{ScheduleWindow, WindowPhase};
use crate::types::time_of_day::TimeOfDay;

/// Shortfalls of this magnitude or less are left alone.
pub const DEAD_BAND: i64 = 1;

/// Everything needed to bring a scheduler up from the curve file.
pub struct SchedulerSetup<'a> {
    pub params: OrderParams,
    pub window: ScheduleWindow,
    pub session_open: TimeOfDay,
    pub utc_offset: FixedOffset,
    pub curve_path: &'a Path,
    pub observer: Option<&'a dyn TrajectoryObserver>,
    pub now: DateTime<Utc>,
}

/// Paces one order along its window trajectory, releasing the shortfall between where the
/// trajectory says we should be and the authoritative position.
pub struct ShortfallScheduler<R> {
    params: OrderParams,
    window: ScheduleWindow,
    utc_offset: FixedOffset,
    trajectory: Trajectory,
    state: ExecutionState,
    session_gate: PolicyChain,
    evaluation_gate: PolicyChain,
    interval: ReevaluationInterval<R>,
    position_sync: PositionSync,
    phase: Option<WindowPhase>,
}

impl<R: Rng> ShortfallScheduler<R> {
    pub fn new(
        params: OrderParams,
        window: ScheduleWindow,
        utc_offset: FixedOffset,
        trajectory: Trajectory,
        interval: ReevaluationInterval<R>,
        positions: watch::Receiver<PositionRecord>,
    ) -> Self {
        let mut position_sync = PositionSync::new(params.instrument().clone(), positions);
        let mut state = ExecutionState::default();
        let position = position_sync.refresh(&mut state);
        if position.quantity != 0 {
            info!(
                quantity = position.quantity,
                average_price = position.open_average_price,
                "starting from existing position"
            );
        }

        Self {
            params,
            window,
            utc_offset,
            trajectory,
            state,
            session_gate: PolicyChain::new(vec![Box::new(TradingWindowPolicy::new(window))]),
            evaluation_gate: PolicyChain::new(vec![Box::new(NextEvaluationPolicy)]),
            interval,
            position_sync,
            phase: None,
        }
    }

    /// Loads the curve and builds the session and window trajectories. Fails when the curve
    /// cannot be read or the window trajectory cannot be built.
    pub fn initialise(
        setup: SchedulerSetup<'_>,
        interval: ReevaluationInterval<R>,
        positions: watch::Receiver<PositionRecord>,
    ) -> Result<Self> {
        let curve = CurveLoader::load(setup.curve_path)?;
        let builder = TrajectoryBuilder::new(setup.params.aggression());

        if let Some(observer) = setup.observer {
            match builder.build_full_curve(curve.fractions(), curve.sigmas()) {
                Ok(session) => observer.on_trajectory("session", setup.session_open, &session),
                Err(error) => warn!(%error, "could not build session trajectory"),
            }
        }

        let trajectory = builder
            .build_window_trajectory(&curve, &setup.window, setup.session_open)
            .with_context(|| format!("cannot build trajectory for window {}", setup.window))?;

        if let Some(observer) = setup.observer {
            observer.on_trajectory("window", setup.window.start(), &trajectory);
        }

        let now = TimeOfDay::at(setup.now, setup.utc_offset);
        info!(
            instrument = %setup.params.instrument(),
            side = %setup.params.side(),
            quantity = setup.params.total_quantity(),
            aggression = setup.params.aggression(),
            window = %setup.window,
            minutes = trajectory.len(),
            "scheduler initialised"
        );
        if let Some(wait) = setup.window.start().minutes_since(now).filter(|wait| *wait > 0) {
            info!(wait_minutes = wait, "waiting for schedule window to open");
        }

        Ok(Self::new(
            setup.params,
            setup.window,
            setup.utc_offset,
            trajectory,
            interval,
            positions,
        ))
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    /// `None` until the first market update.
    pub fn phase(&self) -> Option<WindowPhase> {
        self.phase
    }

    pub fn handle_market_update(&mut self, event: &MarketEvent, now: DateTime<Utc>) -> ScheduleDecision {
        let now_ms = now.timestamp_millis();
        let time_of_day = TimeOfDay::at(now, self.utc_offset);
        self.track_phase(time_of_day);

        let context = ScheduleContext {
            now_ms,
            time_of_day,
            state: &self.state,
        };
        if let Some(reason) = self.session_gate.check(&context) {
            return ScheduleDecision::Skip(reason);
        }

        let MarketEvent::Trade {
            instrument,
            price,
            size,
            ..
        } = event
        else {
            return ScheduleDecision::Skip(SkipReason::NotATrade);
        };

        if instrument != self.params.instrument() || !self.state.market_vwap.on_trade(*price, *size) {
            debug!(?event, "ignoring trade");
            return ScheduleDecision::Skip(SkipReason::RejectedTick);
        }
        self.state.last_trade_price = Price::try_new(*price);

        let context = ScheduleContext {
            now_ms,
            time_of_day,
            state: &self.state,
        };
        if let Some(reason) = self.evaluation_gate.check(&context) {
            return ScheduleDecision::Skip(reason);
        }

        self.evaluate(now_ms, time_of_day)
    }

    pub fn handle_fill(&mut self, report: &ExecutionReport) -> bool {
        self.position_sync.on_fill(report, &mut self.state)
    }

    fn evaluate(&mut self, now_ms: i64, time_of_day: TimeOfDay) -> ScheduleDecision {
        let bucket = self.window.minute_bucket(time_of_day);
        let located = bucket.and_then(|bucket| self.trajectory.get(bucket).map(|point| (bucket, point)));
        let Some((minute_bucket, point)) = located else {
            warn!(
                %time_of_day,
                ?bucket,
                len = self.trajectory.len(),
                "no trajectory bucket for current minute"
            );
            return ScheduleDecision::Skip(SkipReason::MissingBucket {
                bucket,
                len: self.trajectory.len(),
            });
        };

        let total = self.params.signed_quantity();
        let own = self.state.own_filled_quantity;
        let completed_fraction = own as f64 / total as f64;
        let target_quantity = (point.target * total as f64).floor() as i64;
        let shortfall = target_quantity - own;

        let next_evaluation_ms = now_ms + self.interval.next_gap_ms() as i64;
        self.state.next_evaluation_ms = next_evaluation_ms;

        let side = self.params.side();
        let intent = releases_order(side, shortfall).then(|| {
            OrderIntent::day_market(
                self.params.instrument(),
                side,
                shortfall.unsigned_abs(),
                self.state.last_trade_price,
            )
        });

        if let Some(intent) = &intent {
            info!(
                order_id = %intent.order_id,
                side = %intent.side,
                quantity = intent.quantity,
                time_in_force = ?intent.time_in_force,
                "releasing child order"
            );
        }

        ScheduleDecision::Evaluated(Evaluation {
            minute_bucket,
            point,
            completed_fraction,
            target_quantity,
            shortfall,
            next_evaluation_ms,
            intent,
        })
    }

    fn track_phase(&mut self, time_of_day: TimeOfDay) {
        let phase = self.window.phase(time_of_day);
        if self.phase != Some(phase) {
            info!(window = %self.window, ?phase, previous = ?self.phase, "schedule phase changed");
            if phase == WindowPhase::AfterWindow {
                info!(
                    end = %self.window.end(),
                    filled = self.state.own_filled_quantity,
                    ordered = self.params.signed_quantity(),
                    "schedule window closed"
                );
            }
            self.phase = Some(phase);
        }
    }
}

fn releases_order(side: Side, shortfall: i64) -> bool {
    match side {
        Side::Buy => shortfall > DEAD_BAND,
        Side::Sell => shortfall < -DEAD_BAND,
    }
}

impl<R: Rng> ExecutionTactic for ShortfallScheduler<R> {
    fn on_market_update(&mut self, event: &MarketEvent, now: DateTime<Utc>) -> ScheduleDecision {
        self.handle_market_update(event, now)
    }

    fn on_fill_notification(&mut self, report: &ExecutionReport) {
        self.handle_fill(report);
    }
}
