//! Message broker carrying refresh signals.
//!
//! Messages are triggers, not payloads: consumers ignore the content. Delivery
//! is at-least-once and unordered, which the idempotent refresh tolerates.

use async_trait::async_trait;
use futures::stream::BoxStream;

/// RabbitMQ broker
pub mod amqp;
/// In-process broker
pub mod memory;

pub use amqp::AmqpBroker;
pub use memory::MemoryBroker;

/// Errors raised by a broker
#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    /// Connection, channel or protocol failure
    #[error("broker error: {0}")]
    Connection(String),
    /// The broker has been closed
    #[error("broker closed")]
    Closed,
}

/// Stream of message payloads delivered on a queue
pub type Subscription = BoxStream<'static, Result<Vec<u8>, BrokerError>>;

/// Publish / subscribe on named queues.
#[async_trait]
pub trait MessageBroker: Send + Sync {
    /// Publishes `payload` on `queue`, declaring the queue if needed.
    ///
    /// # Errors
    /// * If the broker cannot be reached or has been closed
    async fn publish(&self, queue: &str, payload: &[u8]) -> Result<(), BrokerError>;

    /// Subscribes to `queue`, declaring it if needed. The stream ends when the
    /// broker is closed.
    ///
    /// # Errors
    /// * If the broker cannot be reached or has been closed
    async fn subscribe(&self, queue: &str) -> Result<Subscription, BrokerError>;

    /// Closes the connection. Open subscriptions end.
    ///
    /// # Errors
    /// * If the connection cannot be closed cleanly
    async fn close(&self) -> Result<(), BrokerError>;
}
