pub mod jsonl;
pub mod memory;
pub mod page;

pub use jsonl::JsonlLogStore;
pub use memory::InMemoryLogStore;
pub use page::{Page, PageRequest, Sort, SortDirection, SortField, DEFAULT_PAGE_SIZE};

use crate::error::Result;
use crate::filter::{self, LogFilterSpec, LogPredicate};
use crate::record::{NewRequestLog, RequestLogRecord};

/// Backend for saving and querying request logs.
pub trait RequestLogStore: Send + Sync {
    /// Persist a new entry and return it with its assigned id.
    fn save_request_log(&self, entry: NewRequestLog) -> Result<RequestLogRecord>;

    /// Unfiltered, paginated listing.
    fn find_all(&self, page: &PageRequest) -> Result<Page<RequestLogRecord>>;

    /// Paginated listing of records matching `predicate`.
    fn find_matching(
        &self,
        predicate: &LogPredicate,
        page: &PageRequest,
    ) -> Result<Page<RequestLogRecord>>;

    /// Filtered listing. An absent or empty filter takes the `find_all` path.
    fn find_by_filters(
        &self,
        filter: Option<&LogFilterSpec>,
        page: &PageRequest,
    ) -> Result<Page<RequestLogRecord>> {
        match filter::build(filter) {
            Some(predicate) => {
                tracing::debug!(%predicate, sort = %page.sort(), "filtered log query");
                self.find_matching(&predicate, page)
            }
            None => self.find_all(page),
        }
    }
}

/// Next id for a store holding `records`.
pub(crate) fn next_id(records: &[RequestLogRecord]) -> u64 {
    records.iter().map(|r| r.id).max().unwrap_or(0) + 1
}
