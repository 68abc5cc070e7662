//! Bootstrap example: configure from JSON, install indirection, log.

use logpipe::{info, setup_logger, warn, LoggerRegistry, DEFAULT_CONFIG_PATH, ROOT_LOGGER};
use std::time::Duration;

fn main() {
    let registry = LoggerRegistry::new();

    // Malformed configuration is an operator error; an absent file only
    // downgrades to a console fallback.
    let mut listener = setup_logger(&registry, ROOT_LOGGER, DEFAULT_CONFIG_PATH)
        .expect("logging configuration is malformed");

    let logger = registry.logger("demo.main");
    info!(logger, "demo started on pid {}", std::process::id());
    warn!(logger, "this line goes through the queue, not straight to the sink");

    for i in 0..5 {
        info!(logger, "working on step {}", i);
    }

    // Drain pending records before exit.
    listener.stop(Duration::from_secs(5));
}
