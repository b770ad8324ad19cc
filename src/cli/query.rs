use std::path::Path;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::Result;
use crate::filter::LogFilterSpec;
use crate::masking::MaskingEngine;
use crate::query::LogQueryService;
use crate::storage::{JsonlLogStore, PageRequest};

/// Query the project's request logs and print the page as JSON on stdout.
pub fn run(
    project_root: &Path,
    config: &AppConfig,
    filter: &LogFilterSpec,
    include_payloads: bool,
    page: &PageRequest,
) -> Result<()> {
    let engine = Arc::new(MaskingEngine::compile(&config.masking)?);
    let store = JsonlLogStore::new(config.log_file(project_root));
    let service = LogQueryService::new(store, engine);

    let result = service.query_logs(Some(filter), include_payloads, page)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
