use std::path::Path;

use crate::config::AppConfig;
use crate::error::Result;
use crate::record::NewRequestLog;
use crate::storage::{JsonlLogStore, RequestLogStore};

/// Append one request log entry to the project's log file.
pub fn run(project_root: &Path, config: &AppConfig, entry: NewRequestLog) -> Result<()> {
    let store = JsonlLogStore::new(config.log_file(project_root));
    let record = store.save_request_log(entry)?;
    eprintln!(
        "logwarden: saved request log #{} to {}",
        record.id,
        store.path().display()
    );
    Ok(())
}
