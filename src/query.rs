use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Serialize, Serializer};
use std::sync::Arc;

use crate::error::Result;
use crate::filter::LogFilterSpec;
use crate::masking::MaskingEngine;
use crate::record::RequestLogRecord;
use crate::storage::{Page, PageRequest, RequestLogStore};

/// Fixed marker returned for payloads when the caller didn't ask for them.
pub const REDACTED_MARKER: &str = "[REDACTED]";

/// A log entry as exposed to API callers. Payloads are already masked,
/// truncated or redacted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestLogView {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_ip: Option<String>,
    #[serde(serialize_with = "serialize_millis")]
    pub request_date: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_payload: Option<String>,
}

fn serialize_millis<S: Serializer>(
    date: &DateTime<FixedOffset>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, false))
}

/// Payload policy: absent stays absent, hidden payloads become
/// [`REDACTED_MARKER`] without touching the engine, and shown payloads are
/// masked and truncated.
pub fn render_payload(
    payload: Option<&str>,
    engine: &MaskingEngine,
    include_payloads: bool,
) -> Option<String> {
    let payload = payload?;
    if !include_payloads {
        return Some(REDACTED_MARKER.to_string());
    }
    Some(engine.mask(payload).into_owned())
}

impl RequestLogView {
    pub fn from_record(
        record: RequestLogRecord,
        engine: &MaskingEngine,
        include_payloads: bool,
    ) -> Self {
        Self {
            request_payload: render_payload(
                record.request_payload.as_deref(),
                engine,
                include_payloads,
            ),
            response_payload: render_payload(
                record.response_payload.as_deref(),
                engine,
                include_payloads,
            ),
            id: record.id,
            origin_ip: record.origin_ip,
            request_date: record.request_date,
            method_name: record.method_name,
            duration_ms: record.duration_ms,
        }
    }
}

/// Filtered, paginated log queries with payload masking.
pub struct LogQueryService<S: RequestLogStore> {
    store: S,
    engine: Arc<MaskingEngine>,
}

impl<S: RequestLogStore> LogQueryService<S> {
    pub fn new(store: S, engine: Arc<MaskingEngine>) -> Self {
        Self { store, engine }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn engine(&self) -> &MaskingEngine {
        &self.engine
    }

    pub fn query_logs(
        &self,
        filter: Option<&LogFilterSpec>,
        include_payloads: bool,
        page: &PageRequest,
    ) -> Result<Page<RequestLogView>> {
        tracing::debug!(
            ?filter,
            include_payloads,
            page = page.page(),
            size = page.size(),
            sort = %page.sort(),
            "querying request logs"
        );

        let records = self.store.find_by_filters(filter, page)?;
        Ok(records.map(|record| {
            RequestLogView::from_record(record, &self.engine, include_payloads)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MaskingConfig;
    use crate::record::NewRequestLog;
    use crate::storage::InMemoryLogStore;

    fn engine() -> MaskingEngine {
        MaskingEngine::compile(&MaskingConfig::new(1024, vec!["password".into()])).unwrap()
    }

    #[test]
    fn test_render_payload_policy() {
        let engine = engine();
        assert_eq!(render_payload(None, &engine, true), None);
        assert_eq!(render_payload(None, &engine, false), None);
        assert_eq!(
            render_payload(Some("password=x"), &engine, false).as_deref(),
            Some("[REDACTED]")
        );
        assert_eq!(
            render_payload(Some("password=x"), &engine, true).as_deref(),
            Some("password=[MASKED]")
        );
    }

    #[test]
    fn test_view_serialization_omits_none() {
        let record = NewRequestLog {
            origin_ip: Some("10.0.0.1".into()),
            request_date: Some(DateTime::parse_from_rfc3339("2025-08-22T14:30:00-06:00").unwrap()),
            ..Default::default()
        }
        .into_record(3);
        let view = RequestLogView::from_record(record, &engine(), true);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": 3,
                "originIp": "10.0.0.1",
                "requestDate": "2025-08-22T14:30:00.000-06:00",
            })
        );
    }

    #[test]
    fn test_query_logs_masks_each_record() {
        let store = InMemoryLogStore::new();
        store
            .save_request_log(NewRequestLog {
                request_payload: Some(r#"{"password":"a"}"#.into()),
                response_payload: Some("ok".into()),
                ..Default::default()
            })
            .unwrap();
        let service = LogQueryService::new(store, Arc::new(engine()));

        let page = service
            .query_logs(None, true, &PageRequest::default())
            .unwrap();
        assert_eq!(
            page.content[0].request_payload.as_deref(),
            Some(r#"{"password":"[MASKED]"}"#)
        );
        assert_eq!(page.content[0].response_payload.as_deref(), Some("ok"));
    }
}
