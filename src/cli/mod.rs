pub mod init;
pub mod mask;
pub mod query;
pub mod record;

use chrono::{DateTime, FixedOffset};

/// clap value parser for RFC 3339 timestamps, e.g. `2025-08-22T14:30:00-06:00`.
pub fn parse_timestamp(s: &str) -> std::result::Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(s).map_err(|e| format!("invalid RFC 3339 timestamp '{s}': {e}"))
}
