//! In-memory handler for tests and diagnostics
//!
//! Delivered records are kept in a process-wide store keyed by handler name,
//! so sinks built from a configuration file remain inspectable after the
//! registry has given them away to the listener.

use crate::core::{Handler, LogLevel, LogRecord, Result};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

type Buffer = Arc<Mutex<Vec<LogRecord>>>;

static BUFFERS: Lazy<Mutex<HashMap<String, Buffer>>> = Lazy::new(|| Mutex::new(HashMap::new()));

pub struct MemoryHandler {
    key: String,
    buffer: Buffer,
    level: LogLevel,
}

impl MemoryHandler {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        let buffer = Arc::clone(BUFFERS.lock().entry(key.clone()).or_default());
        Self {
            key,
            buffer,
            level: LogLevel::Trace,
        }
    }

    /// Set the minimum level this sink accepts
    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Snapshot of everything recorded under `key`, in delivery order.
    pub fn records(key: &str) -> Vec<LogRecord> {
        BUFFERS
            .lock()
            .get(key)
            .map(|buffer| buffer.lock().clone())
            .unwrap_or_default()
    }

    /// Discard everything recorded under `key`.
    pub fn clear(key: &str) {
        if let Some(buffer) = BUFFERS.lock().get(key) {
            buffer.lock().clear();
        }
    }
}

impl Handler for MemoryHandler {
    fn emit(&mut self, record: &LogRecord) -> Result<()> {
        self.buffer.lock().push(record.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn level(&self) -> LogLevel {
        self.level
    }

    fn name(&self) -> &str {
        &self.key
    }
}
