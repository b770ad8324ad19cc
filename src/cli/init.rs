use std::path::Path;

use crate::config::{self, AppConfig};
use crate::error::Result;

/// Create `.logwarden/` with a default config and an empty log directory.
pub fn run(project_root: &Path) -> Result<()> {
    let config_path = config::config_path(project_root);
    if config_path.exists() {
        eprintln!("logwarden: .logwarden/ already exists, leaving config untouched");
        return Ok(());
    }

    let config = AppConfig::default();
    std::fs::create_dir_all(config::project_dir(project_root))?;
    std::fs::write(&config_path, config.to_yaml()?)?;

    if let Some(log_dir) = config.log_file(project_root).parent() {
        std::fs::create_dir_all(log_dir)?;
    }

    eprintln!("logwarden: initialized .logwarden/");
    Ok(())
}
