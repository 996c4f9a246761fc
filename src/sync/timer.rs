use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};

use super::gas_price::GasPriceSync;

/// Timer trigger: refreshes the gas price every `period`, first one `period`
/// after the call.
///
/// Ticks missed while a refresh is running are skipped. Runs until `shutdown`
/// flips to `true`.
///
/// # Returns
/// The number of refreshes triggered
pub async fn run_timer(
    sync: Arc<GasPriceSync>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> usize {
    log::info!("sync::timer: Refreshing gas price every {period:?}");
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut ticks = 0;

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
            _ = ticker.tick() => {
                sync.refresh_logged().await;
                ticks += 1;
            }
        }
    }

    log::info!("sync::timer: Stopped after {ticks} refreshes");
    ticks
}
