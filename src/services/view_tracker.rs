use chrono::{DateTime, Utc};
use log::debug;
use std::sync::Arc;

use crate::db::store::{InsertOutcome, StoreError, ViewStore};
use crate::error::ViewError;
use crate::models::page_view::{PageType, ViewKey};
use crate::models::view_stats::{DailyTotals, PageTypeTotals, SlugTotals, ViewSummary, ViewTotals};
use crate::utils::hash_ip::hash_ip;
use crate::utils::view_date::{view_date, window_start};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackResult {
    pub tracked: bool,
}

/// Records one view per page, visitor and UTC+7 day, and reads the counts back.
///
/// A repeat view on the same day leaves the stored record as it is, so
/// `total_views` equals `unique_views` for everything written here.
#[derive(Clone)]
pub struct ViewTracker {
    store: Arc<dyn ViewStore>,
    ip_salt: Option<String>,
}

impl ViewTracker {
    pub fn new(store: Arc<dyn ViewStore>, ip_salt: Option<String>) -> Self {
        Self { store, ip_salt }
    }

    pub async fn ping(&self) -> Result<(), ViewError> {
        Ok(self.store.ping().await?)
    }

    pub async fn record_view(
        &self,
        page_type: &str,
        slug: &str,
        ip_address: &str,
        now: DateTime<Utc>,
    ) -> Result<TrackResult, ViewError> {
        let page_type = page_type.parse::<PageType>()?;
        require_slug(slug)?;

        let key = ViewKey {
            page_type,
            slug: slug.to_string(),
            ip_address: self.visitor_id(ip_address),
            view_date: view_date(now),
        };

        match self
            .store
            .insert_if_absent(&key, now.timestamp_millis())
            .await
        {
            Ok(InsertOutcome::Inserted) => Ok(TrackResult { tracked: true }),
            Ok(InsertOutcome::Existing) => Ok(TrackResult { tracked: false }),
            Err(StoreError::DuplicateKey) => {
                debug!(
                    "Concurrent view of {}/{} on {} already recorded",
                    key.page_type, key.slug, key.view_date
                );
                Ok(TrackResult { tracked: false })
            }
            Err(StoreError::Other(e)) => Err(ViewError::Storage(e)),
        }
    }

    pub async fn view_count(&self, page_type: &str, slug: &str) -> Result<ViewTotals, ViewError> {
        let page_type = page_type.parse::<PageType>()?;
        require_slug(slug)?;

        Ok(self.store.totals(page_type, slug).await?)
    }

    /// Totals for every page type, zero-filled, over the last `days` days or all time
    pub async fn summary(
        &self,
        days: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<ViewSummary, ViewError> {
        let since = days.map(|d| window_start(now, d));
        let found = self.store.totals_by_page_type(since.as_deref()).await?;

        let mut overall = ViewTotals::default();
        let page_types = PageType::all()
            .into_iter()
            .map(|page_type| {
                let totals = found
                    .iter()
                    .find(|t| t.page_type == page_type)
                    .map(|t| t.totals)
                    .unwrap_or_default();
                overall.add(totals);
                PageTypeTotals { page_type, totals }
            })
            .collect();

        Ok(ViewSummary {
            since,
            page_types,
            overall,
        })
    }

    pub async fn top_pages(
        &self,
        page_type: Option<&str>,
        days: Option<u32>,
        limit: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<SlugTotals>, ViewError> {
        let page_type = page_type.map(str::parse::<PageType>).transpose()?;
        let since = days.map(|d| window_start(now, d));

        Ok(self
            .store
            .top_slugs(page_type, since.as_deref(), limit)
            .await?)
    }

    pub async fn daily(
        &self,
        page_type: &str,
        slug: Option<&str>,
        days: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<DailyTotals>, ViewError> {
        let page_type = page_type.parse::<PageType>()?;
        let slug = slug.filter(|s| !s.trim().is_empty());
        let since = window_start(now, days);

        Ok(self.store.daily_totals(page_type, slug, &since).await?)
    }

    fn visitor_id(&self, ip_address: &str) -> String {
        match &self.ip_salt {
            Some(salt) => hash_ip(ip_address, salt),
            None => ip_address.to_string(),
        }
    }
}

fn require_slug(slug: &str) -> Result<(), ViewError> {
    if slug.trim().is_empty() {
        return Err(ViewError::InvalidArgument("slug is required".to_string()));
    }
    Ok(())
}
