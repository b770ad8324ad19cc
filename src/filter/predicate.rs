use chrono::{DateTime, FixedOffset};
use std::fmt;

use crate::record::RequestLogRecord;

/// Composable condition over [`RequestLogRecord`]s.
///
/// Stores evaluate it with [`LogPredicate::matches`]. Date bounds are
/// inclusive and compare instants, so offsets on either side don't matter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogPredicate {
    /// Case-insensitive substring match on the origin IP. Holds the
    /// lowercased needle.
    IpContains(String),
    DateBetween {
        from: DateTime<FixedOffset>,
        to: DateTime<FixedOffset>,
    },
    DateFrom(DateTime<FixedOffset>),
    DateTo(DateTime<FixedOffset>),
    And(Box<LogPredicate>, Box<LogPredicate>),
}

impl LogPredicate {
    pub fn ip_contains(needle: &str) -> Self {
        LogPredicate::IpContains(needle.to_lowercase())
    }

    pub fn and(self, other: LogPredicate) -> Self {
        LogPredicate::And(Box::new(self), Box::new(other))
    }

    pub fn matches(&self, record: &RequestLogRecord) -> bool {
        match self {
            // A record without an origin IP never matches.
            LogPredicate::IpContains(needle) => record
                .origin_ip
                .as_deref()
                .is_some_and(|ip| ip.to_lowercase().contains(needle.as_str())),
            LogPredicate::DateBetween { from, to } => {
                record.request_date >= *from && record.request_date <= *to
            }
            LogPredicate::DateFrom(from) => record.request_date >= *from,
            LogPredicate::DateTo(to) => record.request_date <= *to,
            LogPredicate::And(left, right) => left.matches(record) && right.matches(record),
        }
    }
}

impl fmt::Display for LogPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogPredicate::IpContains(needle) => write!(f, "lower(origin_ip) LIKE '%{needle}%'"),
            LogPredicate::DateBetween { from, to } => write!(
                f,
                "request_date BETWEEN {} AND {}",
                from.to_rfc3339(),
                to.to_rfc3339()
            ),
            LogPredicate::DateFrom(from) => write!(f, "request_date >= {}", from.to_rfc3339()),
            LogPredicate::DateTo(to) => write!(f, "request_date <= {}", to.to_rfc3339()),
            LogPredicate::And(left, right) => write!(f, "({left}) AND ({right})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn record(ip: Option<&str>, date: &str) -> RequestLogRecord {
        RequestLogRecord {
            id: 1,
            origin_ip: ip.map(str::to_string),
            request_date: dt(date),
            method_name: None,
            duration_ms: None,
            request_payload: None,
            response_payload: None,
        }
    }

    #[test]
    fn test_ip_contains_is_case_insensitive() {
        let pred = LogPredicate::ip_contains("FE80");
        assert!(pred.matches(&record(Some("fe80::1"), "2025-01-01T00:00:00Z")));
        assert!(!pred.matches(&record(Some("10.0.0.1"), "2025-01-01T00:00:00Z")));
        assert!(!pred.matches(&record(None, "2025-01-01T00:00:00Z")));
    }

    #[test]
    fn test_between_is_inclusive() {
        let pred = LogPredicate::DateBetween {
            from: dt("2025-01-01T00:00:00Z"),
            to: dt("2025-01-31T23:59:59Z"),
        };
        assert!(pred.matches(&record(None, "2025-01-01T00:00:00Z")));
        assert!(pred.matches(&record(None, "2025-01-31T23:59:59Z")));
        assert!(!pred.matches(&record(None, "2025-02-01T00:00:00Z")));
    }

    #[test]
    fn test_bounds_compare_instants_across_offsets() {
        let pred = LogPredicate::DateFrom(dt("2025-01-01T12:00:00Z"));
        // 06:00-06:00 is 12:00Z
        assert!(pred.matches(&record(None, "2025-01-01T06:00:00-06:00")));
        assert!(!pred.matches(&record(None, "2025-01-01T05:59:59-06:00")));
    }

    #[test]
    fn test_and_requires_both() {
        let pred = LogPredicate::ip_contains("10.0")
            .and(LogPredicate::DateTo(dt("2025-01-01T00:00:00Z")));
        assert!(pred.matches(&record(Some("10.0.0.1"), "2024-12-31T00:00:00Z")));
        assert!(!pred.matches(&record(Some("10.0.0.1"), "2025-01-02T00:00:00Z")));
        assert!(!pred.matches(&record(Some("192.168.0.1"), "2024-12-31T00:00:00Z")));
    }

    #[test]
    fn test_display() {
        let pred = LogPredicate::ip_contains("10.0")
            .and(LogPredicate::DateFrom(dt("2025-01-01T00:00:00+00:00")));
        assert_eq!(
            pred.to_string(),
            "(lower(origin_ip) LIKE '%10.0%') AND (request_date >= 2025-01-01T00:00:00+00:00)"
        );
    }
}
