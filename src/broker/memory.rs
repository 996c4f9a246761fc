use std::collections::HashMap;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::{broadcast, Mutex};

use super::{BrokerError, MessageBroker, Subscription};

/// Messages buffered per queue before slow subscribers start lagging
const QUEUE_CAPACITY: usize = 64;

/// In-process broker.
///
/// Every subscriber of a queue sees every message published after it
/// subscribed. Messages published with no subscriber are dropped. A subscriber
/// that lags behind receives one empty message in place of the ones it missed,
/// which is enough for trigger semantics.
#[derive(Debug)]
pub struct MemoryBroker {
    /// Sender per queue, `None` once closed
    queues: Mutex<Option<HashMap<String, broadcast::Sender<Vec<u8>>>>>,
}

impl MemoryBroker {
    /// Creates an open broker with no queues
    #[must_use]
    pub fn new() -> Self {
        Self {
            queues: Mutex::new(Some(HashMap::new())),
        }
    }
}

impl Default for MemoryBroker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageBroker for MemoryBroker {
    async fn publish(&self, queue: &str, payload: &[u8]) -> Result<(), BrokerError> {
        let mut queues = self.queues.lock().await;
        let queues = queues.as_mut().ok_or(BrokerError::Closed)?;
        let sender = queues
            .entry(queue.to_string())
            .or_insert_with(|| broadcast::channel(QUEUE_CAPACITY).0);
        // No subscriber is not an error for a trigger
        let _ = sender.send(payload.to_vec());
        Ok(())
    }

    async fn subscribe(&self, queue: &str) -> Result<Subscription, BrokerError> {
        let mut queues = self.queues.lock().await;
        let queues = queues.as_mut().ok_or(BrokerError::Closed)?;
        let receiver = queues
            .entry(queue.to_string())
            .or_insert_with(|| broadcast::channel(QUEUE_CAPACITY).0)
            .subscribe();

        let stream = futures::stream::unfold(receiver, |mut receiver| async move {
            match receiver.recv().await {
                Ok(payload) => Some((Ok(payload), receiver)),
                Err(broadcast::error::RecvError::Lagged(_)) => Some((Ok(Vec::new()), receiver)),
                Err(broadcast::error::RecvError::Closed) => None,
            }
        });
        Ok(stream.boxed())
    }

    async fn close(&self) -> Result<(), BrokerError> {
        // Dropping the senders ends every subscription
        self.queues.lock().await.take();
        Ok(())
    }
}
