mod config;
mod curve;
mod events;
mod execution;
mod market;
mod position;
mod scheduling;
mod tactic;
mod types;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Parser;
use dotenvy::dotenv;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::SchedulerConfig;
use crate::config::watcher::ConfigWatcher;
use crate::curve::observer::{JsonTrajectoryDump, TrajectoryObserver};
use crate::events::MarketEvent;
use crate::execution::ExecutionVenue;
use crate::execution::dry_run::DryRunExecutionVenue;
use crate::execution::execution_report::ExecutionReport;
use crate::execution::order_intent::Side;
use crate::market::market_source::MarketDataSource;
use crate::market::simulated_market::SimulatedMarket;
use crate::scheduling::execution_state::ExecutionState;
use crate::scheduling::reevaluation_interval::ReevaluationInterval;
use crate::scheduling::shortfall_scheduler::{SchedulerSetup, ShortfallScheduler};
use crate::scheduling::types::ScheduleDecision;
use crate::tactic::ExecutionTactic;
use crate::types::position::PositionRecord;
use crate::types::schedule_window::ScheduleWindow;

type LiveScheduler = ShortfallScheduler<StdRng>;

#[derive(Debug, Clone, Parser)]
struct Args {
    #[arg(long, default_value = SchedulerConfig::DEFAULT_FILE)]
    pub config: PathBuf,

    #[arg(long, value_enum)]
    pub side: Option<Side>,

    #[arg(long)]
    pub quantity: Option<u64>,

    #[arg(long)]
    pub aggression: Option<f64>,

    /// Dump session and window trajectories as JSON.
    #[arg(long)]
    pub plot: bool,

    /// Seed for the simulated market feed.
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = 100.0)]
    pub start_price: f64,

    #[arg(long, default_value_t = 250)]
    pub tick_ms: u64,

    /// Dry-run venue rejects roughly one order in this many; 0 disables rejects.
    #[arg(long, default_value_t = 10)]
    pub reject_one_in: u32,
}

impl Args {
    fn load_config(&self) -> Result<SchedulerConfig> {
        SchedulerConfig::load(&self.config)?.with_overrides(
            self.side,
            self.quantity,
            self.aggression,
            self.plot,
        )
    }
}

fn build_scheduler(
    config: &SchedulerConfig,
    window: ScheduleWindow,
    positions: watch::Receiver<PositionRecord>,
) -> Result<LiveScheduler> {
    let now = Utc::now();
    let dump = config
        .plot
        .enabled
        .then(|| JsonTrajectoryDump::new(config.plot.dir.clone()));

    let setup = SchedulerSetup {
        params: config.order_params()?,
        window,
        session_open: config.session.open,
        utc_offset: config.utc_offset()?,
        curve_path: &config.curve.path,
        observer: dump.as_ref().map(|dump| dump as &dyn TrajectoryObserver),
        now,
    };
    let interval = ReevaluationInterval::new(
        StdRng::from_os_rng(),
        config.throttle.min_interval_ms,
        config.throttle.max_interval_ms,
    );

    ShortfallScheduler::initialise(setup, interval, positions)
}

/// Rebuilds from the file on disk. A file without `window:` keeps `startup_window`, so the
/// defaulted window does not drift with each reload.
fn reload_scheduler(
    args: &Args,
    current: &SchedulerConfig,
    startup_window: ScheduleWindow,
    positions: watch::Receiver<PositionRecord>,
) -> Result<(SchedulerConfig, LiveScheduler)> {
    let config = args.load_config()?;
    if config.instrument()? != current.instrument()? {
        bail!(
            "instrument cannot change while running ({} -> {})",
            current.order.instrument,
            config.order.instrument
        );
    }

    let window = config.schedule_window_or(startup_window)?;
    let scheduler = build_scheduler(&config, window, positions)?;
    info!(
        %window,
        trajectory_len = scheduler.trajectory().len(),
        "scheduler rebuilt"
    );

    Ok((config, scheduler))
}

fn log_decision(decision: &ScheduleDecision, state: &ExecutionState) {
    match decision {
        ScheduleDecision::Evaluated(evaluation) => info!(
            minute_bucket = evaluation.minute_bucket,
            completed = evaluation.completed_fraction,
            lower = evaluation.point.lower_bound,
            target = evaluation.point.target,
            upper = evaluation.point.upper_bound,
            target_quantity = evaluation.target_quantity,
            own_quantity = state.own_filled_quantity,
            shortfall = evaluation.shortfall,
            own_price = state.own_average_price,
            market_vwap = state.market_vwap.price().map(|price| price.as_f64()),
            next_evaluation_ms = evaluation.next_evaluation_ms,
            "shortfall"
        ),
        ScheduleDecision::Skip(reason) => debug!(%reason, "skipping evaluation"),
    }
}

async fn next_config_change(watcher: &mut Option<ConfigWatcher>) -> Option<PathBuf> {
    match watcher {
        Some(watcher) => watcher.changed().await,
        None => std::future::pending().await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("vwap_scheduler=info".parse()?))
        .with_target(false)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();
    let mut config = args.load_config()?;
    let instrument = config.instrument()?;

    let (market_event_sender, mut market_event_receiver) = mpsc::channel::<MarketEvent>(10_000);
    let (report_sender, _) = broadcast::channel::<ExecutionReport>(10_000);
    let mut report_receiver = report_sender.subscribe();
    let mut report_log_receiver = report_sender.subscribe();

    tokio::spawn(async move {
        loop {
            match report_log_receiver.recv().await {
                Ok(report) => info!(%report, "execution report"),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(lagged = n, "execution report logger lagged; dropped messages");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    tokio::spawn({
        let instrument = instrument.clone();
        let market = SimulatedMarket::new(
            args.start_price,
            Duration::from_millis(args.tick_ms),
            args.seed,
        );
        async move {
            loop {
                if let Err(error) = market
                    .stream(&instrument, market_event_sender.clone())
                    .await
                {
                    error!("simulated market stopped with error: {error:?}");
                }

                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    });

    let venue = DryRunExecutionVenue::new(report_sender.clone()).with_reject_one_in(args.reject_one_in);
    let position_source = venue.spawn_positions(&instrument).await?;

    let startup_window = config.schedule_window(Utc::now())?;
    let mut scheduler = build_scheduler(&config, startup_window, position_source.subscribe())
        .context("failed to initialise scheduler")?;

    let mut watcher = match ConfigWatcher::spawn(&args.config) {
        Ok(watcher) => Some(watcher),
        Err(error) => {
            warn!("config hot reload disabled: {error:#}");
            None
        }
    };

    loop {
        tokio::select! {
            report = report_receiver.recv() => {
                match report {
                    Ok(report) => scheduler.on_fill_notification(&report),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(lagged = n, "scheduler lagged on execution reports; position refreshes on next fill");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        error!("execution report channel closed");
                        break;
                    }
                }
            }

            Some(event) = market_event_receiver.recv() => {
                debug!(instrument = %event.instrument(), timestamp_ms = event.timestamp_ms(), %event);

                let decision = scheduler.on_market_update(&event, Utc::now());
                log_decision(&decision, scheduler.state());
                if let Some(intent) = decision.into_intent() {
                    if let Err(error) = venue.submit(&intent).await {
                        error!(order_id = %intent.order_id, "order submission failed: {error:#}");
                    }
                }
            }

            Some(path) = next_config_change(&mut watcher) => {
                info!(path = %path.display(), "config changed, rebuilding scheduler");

                match reload_scheduler(&args, &config, startup_window, position_source.subscribe()) {
                    Ok((reloaded, rebuilt)) => {
                        config = reloaded;
                        scheduler = rebuilt;
                    }
                    Err(error) => warn!("config reload failed, keeping current scheduler: {error:#}"),
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, shutting down");
                break;
            }
        }
    }

    let state = scheduler.state();
    info!(
        phase = ?scheduler.phase(),
        filled = state.own_filled_quantity,
        average_price = state.own_average_price,
        market_vwap = state.market_vwap.price().map(|price| price.as_f64()),
        market_quantity = state.market_vwap.quantity(),
        "final execution state"
    );

    Ok(())
}
