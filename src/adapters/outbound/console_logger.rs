use crate::domains::logger::DomainLogger;
use std::sync::Arc;

/// Writes to stderr so stdout stays free for `inspect` output.
struct ConsoleBridge;

impl DomainLogger for ConsoleBridge {
    fn info(&self, msg: &str) { eprintln!("{}", msg); }
    fn warn(&self, msg: &str) { eprintln!("WARN: {}", msg); }
    fn error(&self, msg: &str) { eprintln!("ERROR: {}", msg); }
}

/// Console-backed DomainLogger, also the fallback when no log file is configured.
pub fn init_console_logger() -> Arc<dyn DomainLogger> {
    Arc::new(ConsoleBridge {})
}
