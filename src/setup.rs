//! Bootstrap: configuration loading plus queue indirection
//!
//! `setup_logger` is the once-per-process entry point. It applies the
//! declarative configuration, moves the configured handlers off the
//! synchronous emit path, and reports the outcome through the pipeline it
//! just built. After it returns, no log call anywhere in the process blocks
//! on sink I/O; the listener thread is the only writer.

use crate::config::{apply_config, ConfigStatus};
use crate::core::error::Result;
use crate::core::handler::Handler;
use crate::core::level::LogLevel;
use crate::core::listener::Listener;
use crate::core::queue_handler::QueueHandler;
use crate::core::registry::{LoggerRegistry, ROOT_LOGGER};
use crate::handlers::ConsoleHandler;
use crossbeam_channel::unbounded;
use std::path::Path;

/// Default location of the logging configuration document.
pub const DEFAULT_CONFIG_PATH: &str = "config/logger_config.json";

/// Install queue indirection on the named logger.
///
/// Creates a fresh delivery queue, attaches an enqueue-only handler, detaches
/// every other handler in its original order, and starts a listener thread
/// that owns the detached set. Returns once the listener is consuming.
pub fn install(registry: &LoggerRegistry, logger_name: &str) -> Result<Listener> {
    let (sender, receiver) = unbounded();
    let queue_handler: Box<dyn Handler> = Box::new(QueueHandler::new(sender.clone()));
    let originals = registry.swap_handlers(logger_name, queue_handler);
    Listener::start(sender, receiver, originals)
}

/// Configure logging for the process and make emission non-blocking.
///
/// Call once at process start, before any handler-sensitive log call is
/// expected to reach a real sink. `logger_name` is usually the root
/// ([`ROOT_LOGGER`]); `config_path` usually [`DEFAULT_CONFIG_PATH`].
///
/// An absent or unreadable configuration file is tolerated: the process
/// falls back to a last-resort console sink and a WARNING diagnostic.
/// Malformed configuration content is an operator error and is returned as
/// `Err`. Exactly one diagnostic line is emitted per call, through the
/// freshly installed pipeline.
///
/// The returned [`Listener`] keeps delivery alive; dropping it drains the
/// queue with a bounded timeout. Calling `setup_logger` twice on the same
/// registry is unsupported.
pub fn setup_logger(
    registry: &LoggerRegistry,
    logger_name: &str,
    config_path: impl AsRef<Path>,
) -> Result<Listener> {
    let config_path = config_path.as_ref();
    let status = apply_config(registry, config_path)?;

    if matches!(status, ConfigStatus::Unreadable(_)) && registry.handler_count(ROOT_LOGGER) == 0 {
        // Last-resort sink so warnings still reach the operator.
        registry.add_handler(
            ROOT_LOGGER,
            Box::new(ConsoleHandler::new().with_level(LogLevel::Warn)),
        );
    }

    let listener = install(registry, logger_name)?;

    let diagnostics = registry.logger("logpipe.setup");
    match status {
        ConfigStatus::Applied => diagnostics.info(format!(
            "async logger configured from {}",
            config_path.display()
        )),
        ConfigStatus::Unreadable(err) => diagnostics.warn(format!(
            "could not read logger configuration {}: {}; running with fallback defaults",
            config_path.display(),
            err
        )),
    }

    Ok(listener)
}
