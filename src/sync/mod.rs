/// Broker-driven refresh trigger
///
/// One gas price refresh per message on the refresh queue.
pub mod consumer;
/// Gas price refresh and read
pub mod gas_price;
/// Periodic refresh signal publisher
pub mod publisher;
/// Timer-driven refresh trigger
pub mod timer;

pub use consumer::run_consumer;
pub use gas_price::GasPriceSync;
pub use publisher::run_publisher;
pub use timer::run_timer;
