//! Background listener: owns the detached handler set and drains the queue
//!
//! The listener is the only thread that ever invokes the original handlers.
//! It blocks on the queue when idle, dispatches each record to every handler
//! whose threshold qualifies, and isolates per-handler failures so one broken
//! sink never blocks delivery to the others.

use super::{handler::Handler, record::LogRecord};
use crate::core::error::Result;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Default shutdown timeout used when the listener is dropped without an
/// explicit `stop()` call.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Message carried by the delivery queue. `Shutdown` is the stop sentinel:
/// everything enqueued strictly before it is still drained.
#[derive(Debug)]
pub enum QueueMessage {
    Record(LogRecord),
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ListenerState {
    Idle = 0,
    Running = 1,
    Stopping = 2,
    Stopped = 3,
}

impl ListenerState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ListenerState::Idle,
            1 => ListenerState::Running,
            2 => ListenerState::Stopping,
            _ => ListenerState::Stopped,
        }
    }
}

pub struct Listener {
    sender: Sender<QueueMessage>,
    handle: Option<thread::JoinHandle<()>>,
    state: Arc<AtomicU8>,
}

impl Listener {
    /// Spawn the consuming thread for `handlers`, which the listener now
    /// exclusively owns. Returns once the consuming loop is live; does not
    /// wait for any already-enqueued record to be delivered.
    pub(crate) fn start(
        sender: Sender<QueueMessage>,
        receiver: Receiver<QueueMessage>,
        handlers: Vec<Box<dyn Handler>>,
    ) -> Result<Self> {
        let state = Arc::new(AtomicU8::new(ListenerState::Idle as u8));
        let thread_state = Arc::clone(&state);
        let (ready_sender, ready_receiver) = bounded::<()>(1);

        let handle = thread::Builder::new()
            .name("logpipe-listener".to_string())
            .spawn(move || {
                thread_state.store(ListenerState::Running as u8, Ordering::SeqCst);
                let _ = ready_sender.send(());
                run(receiver, handlers, &thread_state);
            })?;

        // Block until the consuming loop has started.
        let _ = ready_receiver.recv();

        Ok(Self {
            sender,
            handle: Some(handle),
            state,
        })
    }

    pub fn state(&self) -> ListenerState {
        ListenerState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Stop the listener: enqueue the shutdown sentinel, drain everything
    /// enqueued before it, flush the handlers, and join the thread.
    ///
    /// Returns `true` if the listener finished within `timeout`. Records
    /// enqueued after the sentinel are never delivered.
    pub fn stop(&mut self, timeout: Duration) -> bool {
        let Some(handle) = self.handle.take() else {
            return true;
        };

        self.state
            .store(ListenerState::Stopping as u8, Ordering::SeqCst);
        let _ = self.sender.send(QueueMessage::Shutdown);

        let start = std::time::Instant::now();
        loop {
            if handle.is_finished() {
                if let Err(e) = handle.join() {
                    eprintln!(
                        "[LOGPIPE ERROR] listener thread panicked during shutdown: {:?}",
                        e
                    );
                    return false;
                }
                return true;
            }

            if start.elapsed() >= timeout {
                eprintln!(
                    "[LOGPIPE WARNING] listener did not drain within {:?}; \
                     pending records may be lost",
                    timeout
                );
                return false;
            }

            thread::sleep(Duration::from_millis(10));
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.stop(DEFAULT_SHUTDOWN_TIMEOUT);
        }
    }
}

fn run(receiver: Receiver<QueueMessage>, mut handlers: Vec<Box<dyn Handler>>, state: &AtomicU8) {
    loop {
        match receiver.recv() {
            Ok(QueueMessage::Record(record)) => {
                deliver(&mut handlers, &record);

                // Drain whatever is immediately available before flushing.
                loop {
                    match receiver.try_recv() {
                        Ok(QueueMessage::Record(record)) => deliver(&mut handlers, &record),
                        Ok(QueueMessage::Shutdown) => {
                            finish(&mut handlers, state);
                            return;
                        }
                        Err(_) => break,
                    }
                }
                flush_all(&mut handlers);
            }
            // Sentinel received, or every producer is gone.
            Ok(QueueMessage::Shutdown) | Err(_) => {
                finish(&mut handlers, state);
                return;
            }
        }
    }
}

/// Dispatch one record to every qualifying handler, in handler-set order.
/// A sink failure or panic is reported and the remaining handlers still get
/// the record.
fn deliver(handlers: &mut [Box<dyn Handler>], record: &LogRecord) {
    for handler in handlers.iter_mut() {
        if record.level < handler.level() {
            continue;
        }

        let result =
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| handler.emit(record)));

        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                eprintln!("[LOGPIPE ERROR] handler '{}' failed: {}", handler.name(), e);
            }
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                eprintln!(
                    "[LOGPIPE CRITICAL] handler '{}' panicked: {}. \
                     Remaining handlers continue to function.",
                    handler.name(),
                    panic_msg
                );
            }
        }
    }
}

fn flush_all(handlers: &mut [Box<dyn Handler>]) {
    for handler in handlers.iter_mut() {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| handler.flush()));
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                eprintln!(
                    "[LOGPIPE ERROR] handler '{}' flush failed: {}",
                    handler.name(),
                    e
                );
            }
            Err(_) => {
                eprintln!(
                    "[LOGPIPE CRITICAL] handler '{}' panicked during flush",
                    handler.name()
                );
            }
        }
    }
}

fn finish(handlers: &mut [Box<dyn Handler>], state: &AtomicU8) {
    flush_all(handlers);
    state.store(ListenerState::Stopped as u8, Ordering::SeqCst);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::LogLevel;
    use crossbeam_channel::unbounded;
    use parking_lot::Mutex;

    struct CollectingHandler {
        records: Arc<Mutex<Vec<LogRecord>>>,
        level: LogLevel,
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

    fn collecting(level: LogLevel) -> (Box<dyn Handler>, Arc<Mutex<Vec<LogRecord>>>) {
        let records = Arc::new(Mutex::new(Vec::new()));
        (
            Box::new(CollectingHandler {
                records: Arc::clone(&records),
                level,
            }),
            records,
        )
    }

    #[test]
    fn test_listener_runs_after_start() {
        let (sender, receiver) = unbounded();
        let mut listener = Listener::start(sender, receiver, Vec::new()).unwrap();
        assert_eq!(listener.state(), ListenerState::Running);
        assert!(listener.stop(Duration::from_secs(1)));
        assert_eq!(listener.state(), ListenerState::Stopped);
    }

    #[test]
    fn test_stop_drains_pending_records() {
        let (sender, receiver) = unbounded();
        let (handler, records) = collecting(LogLevel::Trace);
        let mut listener = Listener::start(sender.clone(), receiver, vec![handler]).unwrap();

        for i in 0..20 {
            let record = LogRecord::new(LogLevel::Info, "app", format!("msg {}", i));
            sender.send(QueueMessage::Record(record)).unwrap();
        }
        assert!(listener.stop(Duration::from_secs(5)));

        let records = records.lock();
        assert_eq!(records.len(), 20);
        assert_eq!(records[0].message, "msg 0");
        assert_eq!(records[19].message, "msg 19");
    }

    #[test]
    fn test_records_after_sentinel_not_delivered() {
        let (sender, receiver) = unbounded();
        let (handler, records) = collecting(LogLevel::Trace);
        let mut listener = Listener::start(sender.clone(), receiver, vec![handler]).unwrap();

        let before = LogRecord::new(LogLevel::Info, "app", "before".to_string());
        sender.send(QueueMessage::Record(before)).unwrap();
        assert!(listener.stop(Duration::from_secs(5)));

        let after = LogRecord::new(LogLevel::Info, "app", "after".to_string());
        let _ = sender.send(QueueMessage::Record(after));

        let records = records.lock();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "before");
    }

    #[test]
    fn test_handler_threshold_respected() {
        let (sender, receiver) = unbounded();
        let (handler, records) = collecting(LogLevel::Warn);
        let mut listener = Listener::start(sender.clone(), receiver, vec![handler]).unwrap();

        for level in [LogLevel::Debug, LogLevel::Info, LogLevel::Warn, LogLevel::Error] {
            let record = LogRecord::new(level, "app", level.to_str().to_string());
            sender.send(QueueMessage::Record(record)).unwrap();
        }
        assert!(listener.stop(Duration::from_secs(5)));

        let records = records.lock();
        let levels: Vec<LogLevel> = records.iter().map(|r| r.level).collect();
        assert_eq!(levels, vec![LogLevel::Warn, LogLevel::Error]);
    }
}
