//! Core pipeline types: levels, records, the handler contract, the logger
//! registry, and the queue/listener pair that makes emission non-blocking.

pub mod error;
pub mod format;
pub mod handler;
pub mod level;
pub mod listener;
pub mod queue_handler;
pub mod record;
pub mod registry;

pub use error::{LoggerError, Result};
pub use format::{Formatter, TimestampFormat, DEFAULT_TEMPLATE};
pub use handler::Handler;
pub use level::LogLevel;
pub use listener::{Listener, ListenerState, QueueMessage, DEFAULT_SHUTDOWN_TIMEOUT};
pub use queue_handler::QueueHandler;
pub use record::LogRecord;
pub use registry::{global, Logger, LoggerRegistry, ROOT_LOGGER};
