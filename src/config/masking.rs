use serde::{Deserialize, Serialize};

use crate::error::{LogwardenError, Result};

/// Masking and truncation settings for logged payloads.
///
/// Loaded once at startup and shared read-only for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskingConfig {
    /// Maximum payload length in Unicode code points. Values `<= 0` disable
    /// truncation in the engine, but are rejected by [`MaskingConfig::validate`].
    #[serde(default = "default_max_payload_length")]
    pub max_payload_length: i64,

    /// Keywords whose values are masked. Matching is case-insensitive.
    #[serde(default)]
    pub sensitive_keywords: Vec<String>,
}

fn default_max_payload_length() -> i64 {
    1024
}

impl Default for MaskingConfig {
    fn default() -> Self {
        Self {
            max_payload_length: default_max_payload_length(),
            sensitive_keywords: Self::default_keywords(),
        }
    }
}

impl MaskingConfig {
    pub fn new(max_payload_length: i64, sensitive_keywords: Vec<String>) -> Self {
        Self {
            max_payload_length,
            sensitive_keywords,
        }
    }

    /// Keywords written into a freshly initialised config file.
    pub fn default_keywords() -> Vec<String> {
        vec!["password".into(), "token".into(), "authorization".into()]
    }

    /// Trimmed keywords with blank entries dropped. Order and duplicates are kept.
    pub fn normalized_keywords(&self) -> Vec<String> {
        self.sensitive_keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Startup validation. A config that would silently disable masking is an error.
    pub fn validate(&self) -> Result<()> {
        if self.max_payload_length < 1 {
            return Err(LogwardenError::InvalidConfig {
                reason: format!(
                    "masking.max_payload_length must be >= 1, got {}",
                    self.max_payload_length
                ),
            });
        }
        if self.normalized_keywords().is_empty() {
            return Err(LogwardenError::InvalidConfig {
                reason: "at least one sensitive keyword must be configured in masking.sensitive_keywords"
                    .into(),
            });
        }
        Ok(())
    }
}
