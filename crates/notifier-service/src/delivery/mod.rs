//! Delivery sinks: the channel a persisted notification is handed to.

pub mod log;
pub mod recording;
pub mod sink;

pub use log::LogSink;
pub use recording::RecordingSink;
pub use sink::DeliverySink;
