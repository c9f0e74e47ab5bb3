use std::time::Duration;

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;
use tokio::sync::mpsc::Sender;
use tracing::info;

use crate::events::MarketEvent;
use crate::market::market_source::MarketDataSource;
use crate::types::instrument::Instrument;

/// Random-walk feed: every tick publishes a bid, an ask and usually a trade.
pub struct SimulatedMarket {
    tick_interval: Duration,
    state: Mutex<WalkState>,
}

struct WalkState {
    rng: StdRng,
    mid: f64,
}

impl SimulatedMarket {
    const SPREAD_BPS: f64 = 2.0;
    const STEP_BPS: f64 = 1.5;

    pub fn new(start_price: f64, tick_interval: Duration, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            tick_interval,
            state: Mutex::new(WalkState {
                rng,
                mid: start_price,
            }),
        }
    }

    async fn next_ticks(&self, instrument: &Instrument) -> Vec<MarketEvent> {
        let mut state = self.state.lock().await;
        let timestamp_ms = Utc::now().timestamp_millis().max(0) as u64;

        let step = state.rng.random_range(-Self::STEP_BPS..=Self::STEP_BPS) / 10_000.0;
        state.mid = (state.mid * (1.0 + step)).max(0.01);

        let mid = state.mid;
        let half_spread = mid * Self::SPREAD_BPS / 20_000.0;
        let bid = mid - half_spread;
        let ask = mid + half_spread;

        let mut ticks = vec![
            MarketEvent::Bid {
                instrument: instrument.clone(),
                price: bid,
                size: state.rng.random_range(1..=20) as f64 * 100.0,
                timestamp_ms,
            },
            MarketEvent::Ask {
                instrument: instrument.clone(),
                price: ask,
                size: state.rng.random_range(1..=20) as f64 * 100.0,
                timestamp_ms,
            },
        ];

        if state.rng.random_bool(0.7) {
            let price = if state.rng.random_bool(0.5) { bid } else { ask };
            let size = state.rng.random_range(1..=10) as f64 * 100.0;

            ticks.push(MarketEvent::Trade {
                instrument: instrument.clone(),
                price,
                size,
                timestamp_ms,
            });
            ticks.push(MarketEvent::Volume {
                instrument: instrument.clone(),
                size,
                timestamp_ms,
            });
        }

        ticks
    }
}

#[async_trait]
impl MarketDataSource for SimulatedMarket {
    async fn stream(&self, instrument: &Instrument, channel: Sender<MarketEvent>) -> Result<()> {
        info!(%instrument, interval_ms = self.tick_interval.as_millis() as u64, "starting simulated market");

        let mut interval = tokio::time::interval(self.tick_interval);
        loop {
            interval.tick().await;

            for event in self.next_ticks(instrument).await {
                if channel.send(event).await.is_err() {
                    bail!("market event receiver dropped");
                }
            }
        }
    }
}
