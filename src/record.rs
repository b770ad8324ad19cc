use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};

/// A persisted request log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestLogRecord {
    pub id: u64,

    /// Caller address. Stored as text so both IPv4 and IPv6 fit.
    pub origin_ip: Option<String>,

    /// When the request was received, with its original offset.
    pub request_date: DateTime<FixedOffset>,

    /// Invoked operation, e.g. "abilities".
    pub method_name: Option<String>,

    pub duration_ms: Option<u64>,

    pub request_payload: Option<String>,

    pub response_payload: Option<String>,
}

/// Input for saving a new log entry. The store assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewRequestLog {
    pub origin_ip: Option<String>,
    pub method_name: Option<String>,
    /// Defaults to the current local time when absent.
    pub request_date: Option<DateTime<FixedOffset>>,
    pub duration_ms: Option<u64>,
    pub request_payload: Option<String>,
    pub response_payload: Option<String>,
}

impl NewRequestLog {
    pub fn into_record(self, id: u64) -> RequestLogRecord {
        RequestLogRecord {
            id,
            origin_ip: self.origin_ip,
            request_date: self
                .request_date
                .unwrap_or_else(|| Local::now().fixed_offset()),
            method_name: self.method_name,
            duration_ms: self.duration_ms,
            request_payload: self.request_payload,
            response_payload: self.response_payload,
        }
    }
}
