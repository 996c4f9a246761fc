use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::broker::MessageBroker;

/// Payload of a refresh signal. Consumers ignore it.
pub const REFRESH_SIGNAL: &[u8] = b"{}";

/// Publishes a refresh signal on `queue` every `period` until `shutdown`
/// flips to `true`. Publish failures are logged and the next period retries.
///
/// # Returns
/// The number of signals published
pub async fn run_publisher(
    broker: Arc<dyn MessageBroker>,
    queue: String,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> usize {
    log::info!("sync::publisher: Signalling {queue} every {period:?}");
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut published = 0;

    loop {
        if *shutdown.borrow() {
            break;
        }
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = ticker.tick() => match broker.publish(&queue, REFRESH_SIGNAL).await {
                Ok(()) => {
                    published += 1;
                    log::debug!("sync::publisher: Signal sent on {queue}");
                }
                Err(e) => log::error!("sync::publisher: Error publishing on {queue}: {e}"),
            }
        }
    }

    published
}
