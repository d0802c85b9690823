use crate::domains::logger::{DomainLogger, FileLogger};
use log::LevelFilter;
use std::str::FromStr;
use std::sync::Arc;

/// Initialize the run log file and return a domain logger the pipeline can inject.
///
/// `level` accepts the usual names (`error`, `warn`, `info`, `debug`, `trace`);
/// anything else falls back to `info`.
pub fn init_file_logger(path: &str, level: &str) -> Result<Arc<dyn DomainLogger>, String> {
    let level = LevelFilter::from_str(level).unwrap_or(LevelFilter::Info);
    FileLogger::init(path, level).map_err(|e| format!("Failed to initialize fast_log: {}", e))?;
    Ok(Arc::new(FileLogger))
}
