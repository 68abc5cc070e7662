//! Handler trait: the uniform contract for log sinks

use super::{error::Result, level::LogLevel, record::LogRecord};

/// A destination that performs the actual delivery of a log record.
///
/// Handlers are opaque to the rest of the pipeline: the registry and the
/// listener only rely on this contract. Each handler carries its own minimum
/// level; records below it are skipped by whoever dispatches to the handler.
pub trait Handler: Send + Sync {
    fn emit(&mut self, record: &LogRecord) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    /// Minimum level this sink accepts.
    fn level(&self) -> LogLevel;
    fn name(&self) -> &str;
}
