use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::watch;

use super::gas_price::GasPriceSync;
use crate::broker::Subscription;

/// Broker trigger: one gas price refresh per delivered message.
///
/// Payloads are ignored. Runs until the subscription ends or `shutdown` flips
/// to `true`.
///
/// # Arguments
/// * `sync` - The refresh action
/// * `subscription` - Messages of the refresh queue
/// * `shutdown` - Stop signal
///
/// # Returns
/// The number of messages handled
pub async fn run_consumer(
    sync: Arc<GasPriceSync>,
    mut subscription: Subscription,
    mut shutdown: watch::Receiver<bool>,
) -> usize {
    log::info!("sync::consumer: Listening for gas price update signals");
    let mut handled = 0;

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
            message = subscription.next() => match message {
                Some(Ok(_)) => {
                    sync.refresh_logged().await;
                    handled += 1;
                    log::debug!("sync::consumer: Gas price updated");
                }
                Some(Err(e)) => log::error!("sync::consumer: Error receiving message: {e}"),
                None => {
                    log::warn!("sync::consumer: Subscription ended");
                    break;
                }
            }
        }
    }

    log::info!("sync::consumer: Stopped after {handled} messages");
    handled
}
