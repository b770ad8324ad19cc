use std::sync::Mutex;

use crate::error::Result;
use crate::filter::LogPredicate;
use crate::record::{NewRequestLog, RequestLogRecord};

use super::{next_id, Page, PageRequest, RequestLogStore};

/// In-memory store. Useful for tests and embedding.
pub struct InMemoryLogStore {
    records: Mutex<Vec<RequestLogRecord>>,
}

impl Default for InMemoryLogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLogStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Seed with existing records, ids included.
    pub fn insert(&self, records: impl IntoIterator<Item = RequestLogRecord>) {
        let mut store = self.records.lock().unwrap_or_else(|e| e.into_inner());
        store.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Vec<RequestLogRecord> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl RequestLogStore for InMemoryLogStore {
    fn save_request_log(&self, entry: NewRequestLog) -> Result<RequestLogRecord> {
        let mut store = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let record = entry.into_record(next_id(&store));
        store.push(record.clone());
        Ok(record)
    }

    fn find_all(&self, page: &PageRequest) -> Result<Page<RequestLogRecord>> {
        Ok(page.apply(self.snapshot()))
    }

    fn find_matching(
        &self,
        predicate: &LogPredicate,
        page: &PageRequest,
    ) -> Result<Page<RequestLogRecord>> {
        let matching = self
            .snapshot()
            .into_iter()
            .filter(|r| predicate.matches(r))
            .collect();
        Ok(page.apply(matching))
    }
}
