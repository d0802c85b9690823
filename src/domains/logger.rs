use chrono::Local;
use log::{error as log_error, info as log_info, warn as log_warn, LevelFilter};
use std::sync::Arc;

/// Pipeline logging port.
/// Progress messages a user reads while a build/solve/render run is going;
/// diagnostic detail goes through `tracing` instead.
pub trait DomainLogger: Send + Sync + 'static {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

pub type DynLogger = Arc<dyn DomainLogger>;

/// Run log appended to a file through `fast_log`.
pub struct FileLogger;

impl FileLogger {
    pub fn init(path: &str, level: LevelFilter) -> Result<(), Box<dyn std::error::Error>> {
        fast_log::init(
            fast_log::config::Config::new()
                .file(path)
                .level(level),
        )?;
        Ok(())
    }
}

impl DomainLogger for FileLogger {
    fn info(&self, msg: &str) {
        log_info!("{} {}", Local::now().format("%Y-%m-%dT%H:%M:%S"), msg);
    }

    fn warn(&self, msg: &str) {
        log_warn!("{} {}", Local::now().format("%Y-%m-%dT%H:%M:%S"), msg);
    }

    fn error(&self, msg: &str) {
        log_error!("{} {}", Local::now().format("%Y-%m-%dT%H:%M:%S"), msg);
    }
}
