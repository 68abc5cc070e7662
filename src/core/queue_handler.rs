//! Enqueue-only handler: the producer side of the queue indirection
//!
//! Emitting through this handler is O(1) and never performs I/O; the record
//! is cloned into the delivery queue and the listener thread does the rest.

use super::{error::Result, handler::Handler, level::LogLevel, listener::QueueMessage,
            record::LogRecord};
use crossbeam_channel::Sender;

pub struct QueueHandler {
    sender: Sender<QueueMessage>,
}

impl QueueHandler {
    pub fn new(sender: Sender<QueueMessage>) -> Self {
        Self { sender }
    }
}

impl Handler for QueueHandler {
    fn emit(&mut self, record: &LogRecord) -> Result<()> {
        // The queue is unbounded, so send never blocks the caller. Panics
        // are deliberately not caught here: a cancellation-style unwind on
        // the caller's context must propagate unmasked.
        match self.sender.send(QueueMessage::Record(record.clone())) {
            Ok(()) => Ok(()),
            // Listener stopped; nothing is draining, silently drop.
            Err(_) => Ok(()),
        }
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Accepts everything; per-sink thresholds are applied by the listener,
    /// exactly as if indirection were absent.
    fn level(&self) -> LogLevel {
        LogLevel::Trace
    }

    fn name(&self) -> &str {
        "queue"
    }
}
