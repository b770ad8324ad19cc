use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LogwardenError {
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("config parse error in {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("failed to compile masking rule for keyword '{keyword}': {reason}")]
    RuleCompile { keyword: String, reason: String },

    #[error("invalid page request: {reason}")]
    InvalidPage { reason: String },

    #[error("storage error: {reason}")]
    Storage { reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LogwardenError>;
