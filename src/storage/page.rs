use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{LogwardenError, Result};
use crate::record::RequestLogRecord;

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Sortable record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Id,
    #[default]
    RequestDate,
    OriginIp,
    MethodName,
    DurationMs,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::RequestDate => "request_date",
            SortField::OriginIp => "origin_ip",
            SortField::MethodName => "method_name",
            SortField::DurationMs => "duration_ms",
        }
    }
}

impl FromStr for SortField {
    type Err = LogwardenError;

    /// Accepts snake_case and camelCase names.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "id" => Ok(SortField::Id),
            "request_date" | "requestDate" => Ok(SortField::RequestDate),
            "origin_ip" | "originIp" => Ok(SortField::OriginIp),
            "method_name" | "methodName" => Ok(SortField::MethodName),
            "duration_ms" | "durationMs" => Ok(SortField::DurationMs),
            other => Err(LogwardenError::InvalidPage {
                reason: format!("unknown sort field '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortDirection {
    type Err = LogwardenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(LogwardenError::InvalidPage {
                reason: format!("unknown sort direction '{other}'"),
            }),
        }
    }
}

/// Sort order. Defaults to newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Compare two records. Ties fall back to ascending id so pages are stable.
    pub fn compare(&self, a: &RequestLogRecord, b: &RequestLogRecord) -> Ordering {
        let ord = match self.field {
            SortField::Id => a.id.cmp(&b.id),
            SortField::RequestDate => a.request_date.cmp(&b.request_date),
            SortField::OriginIp => a.origin_ip.cmp(&b.origin_ip),
            SortField::MethodName => a.method_name.cmp(&b.method_name),
            SortField::DurationMs => a.duration_ms.cmp(&b.duration_ms),
        };
        let ord = match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        };
        ord.then_with(|| a.id.cmp(&b.id))
    }
}

impl FromStr for Sort {
    type Err = LogwardenError;

    /// Parses `field` or `field,direction`, e.g. `request_date,desc`.
    fn from_str(s: &str) -> Result<Self> {
        let (field, direction) = match s.split_once(',') {
            Some((field, direction)) => (
                field.parse::<SortField>()?,
                direction.parse::<SortDirection>()?,
            ),
            None => (s.parse::<SortField>()?, SortDirection::Asc),
        };
        Ok(Self { field, direction })
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{},{}", self.field.as_str(), dir)
    }
}

/// Zero-based page index, page size and sort order. Size is always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    page: usize,
    size: usize,
    sort: Sort,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: Sort::default(),
        }
    }
}

impl PageRequest {
    pub fn new(page: usize, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(LogwardenError::InvalidPage {
                reason: "page size must be at least 1".into(),
            });
        }
        Ok(Self {
            page,
            size,
            sort: Sort::default(),
        })
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn sort(&self) -> Sort {
        self.sort
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }

    /// Sort `records` and cut out this page.
    pub fn apply(&self, mut records: Vec<RequestLogRecord>) -> Page<RequestLogRecord> {
        records.sort_by(|a, b| self.sort.compare(a, b));
        let total_elements = records.len();
        let content = records
            .into_iter()
            .skip(self.offset())
            .take(self.size)
            .collect();
        Page::new(content, self, total_elements)
    }
}

/// One page of results plus totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: usize,
    pub size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: usize) -> Self {
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages: total_elements.div_ceil(request.size),
        }
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn record(id: u64, date: &str, duration: Option<u64>) -> RequestLogRecord {
        RequestLogRecord {
            id,
            origin_ip: None,
            request_date: DateTime::parse_from_rfc3339(date).unwrap(),
            method_name: None,
            duration_ms: duration,
            request_payload: None,
            response_payload: None,
        }
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            PageRequest::new(0, 0),
            Err(LogwardenError::InvalidPage { .. })
        ));
    }

    #[test]
    fn test_parse_sort() {
        let sort: Sort = "requestDate,desc".parse().unwrap();
        assert_eq!(sort, Sort::new(SortField::RequestDate, SortDirection::Desc));
        let sort: Sort = "duration_ms".parse().unwrap();
        assert_eq!(sort, Sort::new(SortField::DurationMs, SortDirection::Asc));
        assert!("bogus,asc".parse::<Sort>().is_err());
        assert!("id,sideways".parse::<Sort>().is_err());
        assert_eq!(sort.to_string(), "duration_ms,asc");
    }

    #[test]
    fn test_default_sort_newest_first() {
        let records = vec![
            record(1, "2025-01-01T00:00:00Z", None),
            record(2, "2025-03-01T00:00:00Z", None),
            record(3, "2025-02-01T00:00:00Z", None),
        ];
        let page = PageRequest::default().apply(records);
        let ids: Vec<u64> = page.content.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_slicing_and_totals() {
        let records: Vec<_> = (1..=5)
            .map(|i| record(i, "2025-01-01T00:00:00Z", Some(i * 10)))
            .collect();
        let request = PageRequest::new(1, 2)
            .unwrap()
            .with_sort(Sort::new(SortField::Id, SortDirection::Asc));

        let page = request.apply(records);
        let ids: Vec<u64> = page.content.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 4]);
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 1);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let records = vec![record(1, "2025-01-01T00:00:00Z", None)];
        let page = PageRequest::new(4, 10).unwrap().apply(records);
        assert!(page.is_empty());
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_map_keeps_totals() {
        let records = vec![record(1, "2025-01-01T00:00:00Z", None)];
        let page = PageRequest::default().apply(records).map(|r| r.id * 100);
        assert_eq!(page.content, vec![100]);
        assert_eq!(page.total_elements, 1);
    }
}
