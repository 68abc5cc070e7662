//! Process-wide logger registry
//!
//! The registry maps dotted logger names to their attached handlers,
//! effective level, and propagation flag. It is the single piece of shared
//! mutable state between caller contexts; handlers moved off a logger by the
//! indirection installer are no longer reachable through it.

use super::{handler::Handler, level::LogLevel, record::LogRecord};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Name of the root logger.
pub const ROOT_LOGGER: &str = "";

static GLOBAL_REGISTRY: Lazy<LoggerRegistry> = Lazy::new(LoggerRegistry::new);

/// The process-wide default registry.
///
/// Constructed on first access and never torn down. Intended to be configured
/// exactly once at process start via [`crate::setup::setup_logger`]; library
/// code and tests that want isolation should construct their own
/// [`LoggerRegistry`] instead.
pub fn global() -> &'static LoggerRegistry {
    &GLOBAL_REGISTRY
}

struct LoggerState {
    level: Option<LogLevel>,
    handlers: Vec<Box<dyn Handler>>,
    propagate: bool,
}

impl Default for LoggerState {
    fn default() -> Self {
        Self {
            level: None,
            handlers: Vec::new(),
            propagate: true,
        }
    }
}

/// Per-logger settings computed by the configuration loader, applied to the
/// registry under a single write lock.
pub(crate) struct LoggerPlan {
    pub(crate) name: String,
    pub(crate) level: Option<LogLevel>,
    pub(crate) propagate: bool,
    pub(crate) handlers: Vec<Box<dyn Handler>>,
}

#[derive(Clone)]
pub struct LoggerRegistry {
    inner: Arc<RwLock<HashMap<String, LoggerState>>>,
}

impl LoggerRegistry {
    #[must_use]
    pub fn new() -> Self {
        let mut map = HashMap::new();
        map.insert(
            ROOT_LOGGER.to_string(),
            LoggerState {
                level: Some(LogLevel::Info),
                handlers: Vec::new(),
                propagate: true,
            },
        );
        Self {
            inner: Arc::new(RwLock::new(map)),
        }
    }

    /// Obtain a handle for the named logger. Handles are cheap and do not
    /// create registry state; state appears when handlers or levels are set.
    #[must_use]
    pub fn logger(&self, name: &str) -> Logger {
        Logger {
            registry: self.clone(),
            name: name.to_string(),
        }
    }

    /// Effective level of the named logger: the nearest ancestor with an
    /// explicit level, ending at the root.
    pub fn effective_level(&self, name: &str) -> LogLevel {
        let map = self.inner.read();
        for ancestor in ancestry(name) {
            if let Some(state) = map.get(ancestor) {
                if let Some(level) = state.level {
                    return level;
                }
            }
        }
        LogLevel::Info
    }

    pub fn set_level(&self, name: &str, level: LogLevel) {
        let mut map = self.inner.write();
        map.entry(name.to_string()).or_default().level = Some(level);
    }

    pub fn set_propagate(&self, name: &str, propagate: bool) {
        let mut map = self.inner.write();
        map.entry(name.to_string()).or_default().propagate = propagate;
    }

    pub fn add_handler(&self, name: &str, handler: Box<dyn Handler>) {
        let mut map = self.inner.write();
        map.entry(name.to_string()).or_default().handlers.push(handler);
    }

    pub fn handler_count(&self, name: &str) -> usize {
        let map = self.inner.read();
        map.get(name).map_or(0, |state| state.handlers.len())
    }

    pub fn handler_names(&self, name: &str) -> Vec<String> {
        let map = self.inner.read();
        map.get(name).map_or_else(Vec::new, |state| {
            state
                .handlers
                .iter()
                .map(|handler| handler.name().to_string())
                .collect()
        })
    }

    /// Atomically replace every handler on `name` with `handler`, returning
    /// the detached handlers in their original attachment order. Ownership of
    /// the returned set moves to the caller; the registry keeps no aliases.
    pub fn swap_handlers(&self, name: &str, handler: Box<dyn Handler>) -> Vec<Box<dyn Handler>> {
        let mut map = self.inner.write();
        let state = map.entry(name.to_string()).or_default();
        let originals = std::mem::take(&mut state.handlers);
        state.handlers.push(handler);
        originals
    }

    pub(crate) fn apply_plan(&self, plan: Vec<LoggerPlan>) {
        let mut map = self.inner.write();
        for entry in plan {
            let state = map.entry(entry.name).or_default();
            if let Some(level) = entry.level {
                state.level = Some(level);
            }
            state.propagate = entry.propagate;
            state.handlers = entry.handlers;
        }
    }

    /// Walk the ancestry chain and hand the record to every qualifying
    /// handler. Handler failures are reported on the internal error path and
    /// never reach the caller.
    pub(crate) fn dispatch(&self, record: &LogRecord) {
        let mut map = self.inner.write();
        for ancestor in ancestry(&record.logger) {
            let Some(state) = map.get_mut(ancestor) else {
                continue;
            };
            for handler in state.handlers.iter_mut() {
                if record.level < handler.level() {
                    continue;
                }
                if let Err(e) = handler.emit(record) {
                    eprintln!(
                        "[LOGPIPE ERROR] handler '{}' failed to emit: {}",
                        handler.name(),
                        e
                    );
                }
            }
            if !state.propagate {
                break;
            }
        }
    }
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// `"a.b.c"` yields `["a.b.c", "a.b", "a", ""]`; the root yields itself.
fn ancestry(name: &str) -> Vec<&str> {
    let mut chain = vec![name];
    let mut current = name;
    while let Some(idx) = current.rfind('.') {
        current = &current[..idx];
        chain.push(current);
    }
    if !name.is_empty() {
        chain.push(ROOT_LOGGER);
    }
    chain
}

/// Handle to a named logger in a [`LoggerRegistry`].
#[derive(Clone)]
pub struct Logger {
    registry: LoggerRegistry,
    name: String,
}

impl Logger {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.registry.effective_level(&self.name)
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        if !self.is_enabled(level) {
            return;
        }
        let record = LogRecord::new(level, &self.name, message.into());
        self.registry.dispatch(&record);
    }

    /// Like [`Logger::log`] but carries source-location metadata; used by the
    /// logging macros.
    pub fn log_at(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        file: &'static str,
        line: u32,
        module_path: &'static str,
    ) {
        if !self.is_enabled(level) {
            return;
        }
        let record = LogRecord::new(level, &self.name, message.into())
            .with_location(file, line, module_path);
        self.registry.dispatch(&record);
    }

    #[inline]
    pub fn trace(&self, message: impl Into<String>) {
        self.log(LogLevel::Trace, message);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    pub fn fatal(&self, message: impl Into<String>) {
        self.log(LogLevel::Fatal, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Result;
    use parking_lot::Mutex;

    struct CollectingHandler {
        records: Arc<Mutex<Vec<LogRecord>>>,
        level: LogLevel,
    }

    impl CollectingHandler {
        fn new(level: LogLevel) -> (Self, Arc<Mutex<Vec<LogRecord>>>) {
            let records = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    records: Arc::clone(&records),
                    level,
                },
                records,
            )
        }
    }

    impl Handler for CollectingHandler {
        fn emit(&mut self, record: &LogRecord) -> Result<()> {
            self.records.lock().push(record.clone());
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn level(&self) -> LogLevel {
            self.level
        }

        fn name(&self) -> &str {
            "collecting"
        }
    }

    #[test]
    fn test_ancestry_chain() {
        assert_eq!(ancestry("a.b.c"), vec!["a.b.c", "a.b", "a", ""]);
        assert_eq!(ancestry("a"), vec!["a", ""]);
        assert_eq!(ancestry(""), vec![""]);
    }

    #[test]
    fn test_effective_level_inherits_from_ancestors() {
        let registry = LoggerRegistry::new();
        assert_eq!(registry.effective_level("app.db"), LogLevel::Info);

        registry.set_level("app", LogLevel::Debug);
        assert_eq!(registry.effective_level("app.db"), LogLevel::Debug);

        registry.set_level("app.db", LogLevel::Error);
        assert_eq!(registry.effective_level("app.db"), LogLevel::Error);
        assert_eq!(registry.effective_level("app.web"), LogLevel::Debug);
    }

    #[test]
    fn test_records_propagate_to_root_handlers() {
        let registry = LoggerRegistry::new();
        let (handler, records) = CollectingHandler::new(LogLevel::Trace);
        registry.add_handler(ROOT_LOGGER, Box::new(handler));

        registry.set_level(ROOT_LOGGER, LogLevel::Debug);
        registry.logger("app.request").debug("incoming");

        let records = records.lock();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].logger, "app.request");
    }

    #[test]
    fn test_propagate_false_stops_ancestry_walk() {
        let registry = LoggerRegistry::new();
        let (root_handler, root_records) = CollectingHandler::new(LogLevel::Trace);
        let (app_handler, app_records) = CollectingHandler::new(LogLevel::Trace);
        registry.add_handler(ROOT_LOGGER, Box::new(root_handler));
        registry.add_handler("app", Box::new(app_handler));
        registry.set_propagate("app", false);

        registry.logger("app").info("contained");

        assert_eq!(app_records.lock().len(), 1);
        assert!(root_records.lock().is_empty());
    }

    #[test]
    fn test_handler_threshold_applies_on_dispatch() {
        let registry = LoggerRegistry::new();
        let (handler, records) = CollectingHandler::new(LogLevel::Warn);
        registry.add_handler(ROOT_LOGGER, Box::new(handler));

        let logger = registry.logger("");
        logger.info("below threshold");
        logger.warn("at threshold");

        let records = records.lock();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, LogLevel::Warn);
    }

    #[test]
    fn test_swap_handlers_preserves_order_and_leaves_one() {
        let registry = LoggerRegistry::new();
        let (first, _) = CollectingHandler::new(LogLevel::Trace);
        let (second, _) = CollectingHandler::new(LogLevel::Warn);
        registry.add_handler(ROOT_LOGGER, Box::new(first));
        registry.add_handler(ROOT_LOGGER, Box::new(second));

        let (replacement, _) = CollectingHandler::new(LogLevel::Trace);
        let originals = registry.swap_handlers(ROOT_LOGGER, Box::new(replacement));

        assert_eq!(originals.len(), 2);
        assert_eq!(originals[0].level(), LogLevel::Trace);
        assert_eq!(originals[1].level(), LogLevel::Warn);
        assert_eq!(registry.handler_count(ROOT_LOGGER), 1);
    }

    #[test]
    fn test_below_effective_level_creates_no_record() {
        let registry = LoggerRegistry::new();
        let (handler, records) = CollectingHandler::new(LogLevel::Trace);
        registry.add_handler(ROOT_LOGGER, Box::new(handler));

        // Root defaults to Info
        registry.logger("app").debug("filtered out");
        assert!(records.lock().is_empty());
    }
}
