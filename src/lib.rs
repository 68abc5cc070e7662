//! # logpipe
//!
//! A process-wide logging bootstrap that keeps log emission off the blocking
//! I/O path. Callers log through the usual named-logger API; an enqueue-only
//! handler forwards every record to a dedicated listener thread, which owns
//! the real sinks and performs the actual writes.
//!
//! ## Features
//!
//! - **Non-blocking emission**: enqueue is O(1); a slow sink only slows the
//!   listener thread, never a caller
//! - **Declarative configuration**: a JSON document describing formatters,
//!   handlers, and the logger hierarchy
//! - **Per-handler thresholds**: original handler levels are honored after
//!   indirection, exactly as if it were absent
//! - **Partial-failure isolation**: one broken sink never blocks or drops
//!   delivery to the others
//!
//! ## Usage
//!
//! ```no_run
//! use logpipe::{setup_logger, LoggerRegistry, ROOT_LOGGER, DEFAULT_CONFIG_PATH};
//!
//! let registry = LoggerRegistry::new();
//! let _listener = setup_logger(&registry, ROOT_LOGGER, DEFAULT_CONFIG_PATH)
//!     .expect("logging configuration is malformed");
//!
//! let logger = registry.logger("app.request");
//! logger.info("handling request");
//! ```

pub mod config;
pub mod core;
pub mod handlers;
pub mod macros;
pub mod setup;

pub mod prelude {
    pub use crate::config::{apply_config, ConfigStatus, LoggingConfig};
    pub use crate::core::{
        global, Formatter, Handler, Listener, ListenerState, LogLevel, LogRecord, Logger,
        LoggerError, LoggerRegistry, QueueHandler, Result, TimestampFormat,
        DEFAULT_SHUTDOWN_TIMEOUT, ROOT_LOGGER,
    };
    pub use crate::handlers::{ConsoleHandler, FileHandler, MemoryHandler};
    pub use crate::setup::{install, setup_logger, DEFAULT_CONFIG_PATH};
}

pub use crate::config::{apply_config, ConfigStatus, LoggingConfig};
pub use crate::core::{
    global, Formatter, Handler, Listener, ListenerState, LogLevel, LogRecord, Logger, LoggerError,
    LoggerRegistry, QueueHandler, Result, TimestampFormat, DEFAULT_SHUTDOWN_TIMEOUT, ROOT_LOGGER,
};
pub use crate::handlers::{ConsoleHandler, FileHandler, MemoryHandler};
pub use crate::setup::{install, setup_logger, DEFAULT_CONFIG_PATH};
