use async_trait::async_trait;
use thiserror::Error;

use crate::models::page_view::{PageType, ViewKey};
use crate::models::view_stats::{DailyTotals, PageTypeTotals, SlugTotals, ViewTotals};

#[derive(Debug, Error)]
pub enum StoreError {
    /// Another writer inserted the same visit key first.
    #[error("view key already exists")]
    DuplicateKey,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Existing,
}

/// Persistence for view records. Uniqueness of `ViewKey` is the store's job.
#[async_trait]
pub trait ViewStore: Send + Sync {
    /// Check that the backend is reachable
    async fn ping(&self) -> StoreResult<()>;

    /// Create the record for `key` with a count of one, or leave an existing one untouched
    async fn insert_if_absent(&self, key: &ViewKey, now_millis: i64) -> StoreResult<InsertOutcome>;

    /// Record count and viewCount sum for one page
    async fn totals(&self, page_type: PageType, slug: &str) -> StoreResult<ViewTotals>;

    /// Totals grouped by page type, restricted to `view_date >= since` when given
    async fn totals_by_page_type(&self, since: Option<&str>) -> StoreResult<Vec<PageTypeTotals>>;

    /// Most viewed slugs ordered by unique views desc, then slug asc
    async fn top_slugs(
        &self,
        page_type: Option<PageType>,
        since: Option<&str>,
        limit: u32,
    ) -> StoreResult<Vec<SlugTotals>>;

    /// Totals per view date ascending, from `since` onwards
    async fn daily_totals(
        &self,
        page_type: PageType,
        slug: Option<&str>,
        since: &str,
    ) -> StoreResult<Vec<DailyTotals>>;
}
