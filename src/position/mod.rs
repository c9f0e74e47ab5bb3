pub mod position_sync;

use tokio::sync::watch;

use crate::types::position::PositionRecord;

pub trait PositionSource: Send + Sync {
    /// Returns a receiver that always holds the latest authoritative position.
    fn subscribe(&self) -> watch::Receiver<PositionRecord>;
}
