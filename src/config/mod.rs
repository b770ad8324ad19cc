pub mod app;
pub mod masking;

pub use app::*;
pub use masking::*;

use std::path::{Path, PathBuf};

/// Returns the per-project state directory: `<root>/.logwarden/`
pub fn project_dir(project_root: &Path) -> PathBuf {
    project_root.join(".logwarden")
}

/// Returns the project config path: `<root>/.logwarden/config.yml`
pub fn config_path(project_root: &Path) -> PathBuf {
    project_dir(project_root).join("config.yml")
}
