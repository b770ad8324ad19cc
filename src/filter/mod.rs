//! Turns optional query criteria into a [`LogPredicate`].
//!
//! Every builder returns `None` when there is nothing to filter on. Callers
//! take `None` as "fetch all, paginated" rather than evaluating an
//! always-true predicate.

pub mod predicate;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

pub use predicate::LogPredicate;

/// Optional narrowing criteria for a log query. Built per request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFilterSpec {
    /// Substring of the origin IP, matched case-insensitively.
    pub origin_ip: Option<String>,
    /// Inclusive lower bound on the request date.
    pub date_from: Option<DateTime<FixedOffset>>,
    /// Inclusive upper bound on the request date.
    pub date_to: Option<DateTime<FixedOffset>>,
}

impl LogFilterSpec {
    pub fn new(
        origin_ip: Option<String>,
        date_from: Option<DateTime<FixedOffset>>,
        date_to: Option<DateTime<FixedOffset>>,
    ) -> Self {
        Self {
            origin_ip,
            date_from,
            date_to,
        }
    }

    pub fn with_origin_ip(mut self, ip: impl Into<String>) -> Self {
        self.origin_ip = Some(ip.into());
        self
    }

    pub fn with_date_from(mut self, from: DateTime<FixedOffset>) -> Self {
        self.date_from = Some(from);
        self
    }

    pub fn with_date_to(mut self, to: DateTime<FixedOffset>) -> Self {
        self.date_to = Some(to);
        self
    }

    /// True when the IP is absent or blank and both dates are absent.
    pub fn is_empty(&self) -> bool {
        is_blank(self.origin_ip.as_deref()) && self.date_from.is_none() && self.date_to.is_none()
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Case-insensitive "contains" on the origin IP, or `None` for a blank needle.
pub fn by_origin_ip(substring: Option<&str>) -> Option<LogPredicate> {
    match substring {
        Some(needle) if !needle.trim().is_empty() => Some(LogPredicate::ip_contains(needle)),
        _ => None,
    }
}

/// Inclusive date bound(s), or `None` when both ends are open.
pub fn by_date_range(
    from: Option<DateTime<FixedOffset>>,
    to: Option<DateTime<FixedOffset>>,
) -> Option<LogPredicate> {
    match (from, to) {
        (Some(from), Some(to)) => Some(LogPredicate::DateBetween { from, to }),
        (Some(from), None) => Some(LogPredicate::DateFrom(from)),
        (None, Some(to)) => Some(LogPredicate::DateTo(to)),
        (None, None) => None,
    }
}

/// AND of the IP and date predicates that are present.
pub fn build(spec: Option<&LogFilterSpec>) -> Option<LogPredicate> {
    let spec = spec.filter(|s| !s.is_empty())?;

    let ip = by_origin_ip(spec.origin_ip.as_deref());
    let dates = by_date_range(spec.date_from, spec.date_to);

    match (ip, dates) {
        (Some(ip), Some(dates)) => Some(ip.and(dates)),
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => None,
    }
}
