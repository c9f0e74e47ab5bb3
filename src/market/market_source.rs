use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use crate::events::MarketEvent;
use crate::types::instrument::Instrument;

/// Streams ticks for one instrument into `channel` until the feed drops or the receiver
/// goes away. Callers reconnect by calling again.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn stream(&self, instrument: &Instrument, channel: Sender<MarketEvent>) -> Result<()>;
}
