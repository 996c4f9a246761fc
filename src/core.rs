//! Lifecycle of the background gas price refresh.
//!
//! [`RefreshService::start`] warms the cache with one refresh, then runs the
//! timer trigger and the broker trigger side by side until
//! [`RefreshService::stop`] is called.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::broker::{BrokerError, MessageBroker};
use crate::sync::{run_consumer, run_timer, GasPriceSync};
use crate::utils::app_context::AppContext;

/// Running refresh triggers
pub struct RefreshService {
    /// Flipped to `true` to stop the triggers
    shutdown: watch::Sender<bool>,
    /// Timer trigger task
    timer: JoinHandle<usize>,
    /// Broker trigger task
    consumer: JoinHandle<usize>,
    /// Broker the consumer listens on, closed on stop
    broker: Arc<dyn MessageBroker>,
}

impl RefreshService {
    /// Performs the initial refresh and starts both triggers.
    ///
    /// # Errors
    /// * If the refresh queue cannot be subscribed to
    pub async fn start(ctx: &AppContext) -> Result<Self, BrokerError> {
        let sync = Arc::new(ctx.gas_price_sync());
        let queue = &ctx.config.gas_price_queue;

        // Subscribe before anything runs so no signal is missed
        let subscription = ctx.broker.subscribe(queue).await?;
        log::info!("core: Subscribed to {queue}");

        sync.refresh_logged().await;

        let (shutdown, shutdown_rx) = watch::channel(false);
        let timer = tokio::spawn(run_timer(
            sync.clone(),
            ctx.config.gas_price_refresh,
            shutdown_rx.clone(),
        ));
        let consumer = tokio::spawn(run_consumer(sync, subscription, shutdown_rx));

        Ok(Self {
            shutdown,
            timer,
            consumer,
            broker: ctx.broker.clone(),
        })
    }

    /// Stops both triggers, waits for them and closes the broker.
    ///
    /// # Returns
    /// The number of refreshes triggered by the timer and by the broker
    ///
    /// # Errors
    /// * If the broker connection cannot be closed cleanly
    pub async fn stop(self) -> Result<(usize, usize), BrokerError> {
        // Both tasks hold a receiver, so the send cannot fail while they run
        let _ = self.shutdown.send(true);

        let timer_ticks = self.timer.await.unwrap_or_else(|e| {
            log::error!("core: Timer trigger failed: {e}");
            0
        });
        let messages = self.consumer.await.unwrap_or_else(|e| {
            log::error!("core: Broker trigger failed: {e}");
            0
        });

        self.broker.close().await?;
        log::info!("core: Stopped after {timer_ticks} timer and {messages} broker refreshes");
        Ok((timer_ticks, messages))
    }
}

/// Runs the refresh triggers until Ctrl-C.
///
/// # Errors
/// * If the triggers cannot be started or stopped
/// * If the Ctrl-C handler cannot be installed
pub async fn serve(ctx: &AppContext) -> eyre::Result<()> {
    let service = RefreshService::start(ctx).await?;
    log::info!("core: Gas price refresh running, press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    log::info!("core: Shutting down");

    service.stop().await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::broker::MemoryBroker;
    use crate::cache::MemoryCache;
    use crate::config::Config;
    use crate::test_helpers::FakeLedger;
    use std::time::Duration;

    fn context(ledger: Arc<FakeLedger>, broker: Arc<MemoryBroker>) -> AppContext {
        let config = Config {
            gas_price_refresh: Duration::from_secs(3600),
            ..Config::default()
        };
        AppContext::with_parts(config, ledger, Arc::new(MemoryCache::new()), broker)
    }

    #[tokio::test]
    async fn test_start_warms_cache() {
        let ledger = Arc::new(FakeLedger::default());
        ledger.set_gas_price(21_000_000_000);
        let ctx = context(ledger.clone(), Arc::new(MemoryBroker::new()));

        let service = RefreshService::start(&ctx).await.unwrap();
        assert_eq!(ledger.gas_price_calls(), 1);
        assert_eq!(
            ctx.gas_price_sync().cached_gas_price().await.unwrap().gas_price,
            "21.0"
        );
        assert_eq!(service.stop().await.unwrap(), (0, 0));
    }

    #[tokio::test]
    async fn test_broker_signals_refresh_until_stop() {
        let ledger = Arc::new(FakeLedger::default());
        let broker = Arc::new(MemoryBroker::new());
        let ctx = context(ledger.clone(), broker.clone());

        let service = RefreshService::start(&ctx).await.unwrap();
        broker.publish("gas-price-update", b"{}").await.unwrap();
        broker.publish("gas-price-update", b"{}").await.unwrap();
        tokio::time::timeout(Duration::from_secs(2), async {
            while ledger.gas_price_calls() < 3 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();

        assert_eq!(service.stop().await.unwrap(), (0, 2));
        assert!(matches!(
            broker.publish("gas-price-update", b"{}").await,
            Err(BrokerError::Closed)
        ));
    }
}
