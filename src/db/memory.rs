use anyhow::anyhow;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::db::store::{InsertOutcome, StoreError, StoreResult, ViewStore};
use crate::models::page_view::{PageType, ViewKey, ViewRecord};
use crate::models::view_stats::{DailyTotals, PageTypeTotals, SlugTotals, ViewTotals};

/// In-process store for tests, with the same uniqueness contract as MongoDB.
#[derive(Default)]
pub struct MemoryViewStore {
    records: Mutex<Vec<ViewRecord>>,
    offline: AtomicBool,
    lose_next_race: AtomicBool,
}

impl MemoryViewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails as if the database were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Next insert behaves like the losing writer of a concurrent upsert.
    pub fn lose_next_race(&self) {
        self.lose_next_race.store(true, Ordering::SeqCst);
    }

    pub fn seed(&self, record: ViewRecord) {
        self.records.lock().unwrap().push(record);
    }

    pub fn records(&self) -> Vec<ViewRecord> {
        self.records.lock().unwrap().clone()
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(anyhow!("connection refused").into());
        }
        Ok(())
    }

    fn matching<F>(&self, pred: F) -> Vec<ViewRecord>
    where
        F: Fn(&ViewRecord) -> bool,
    {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| pred(r))
            .cloned()
            .collect()
    }
}

fn sum(records: &[ViewRecord]) -> ViewTotals {
    ViewTotals {
        unique_views: records.len() as i64,
        total_views: records.iter().map(|r| r.view_count).sum(),
    }
}

fn same_key(record: &ViewRecord, key: &ViewKey) -> bool {
    record.page_type == key.page_type
        && record.slug == key.slug
        && record.ip_address == key.ip_address
        && record.view_date == key.view_date
}

fn since_ok(record: &ViewRecord, since: Option<&str>) -> bool {
    since.is_none_or(|since| record.view_date.as_str() >= since)
}

#[async_trait]
impl ViewStore for MemoryViewStore {
    async fn ping(&self) -> StoreResult<()> {
        self.check_online()
    }

    async fn insert_if_absent(&self, key: &ViewKey, now_millis: i64) -> StoreResult<InsertOutcome> {
        self.check_online()?;
        let mut records = self.records.lock().unwrap();

        if self.lose_next_race.swap(false, Ordering::SeqCst) {
            if !records.iter().any(|r| same_key(r, key)) {
                records.push(ViewRecord::new(key.clone(), now_millis));
            }
            return Err(StoreError::DuplicateKey);
        }

        if records.iter().any(|r| same_key(r, key)) {
            return Ok(InsertOutcome::Existing);
        }
        records.push(ViewRecord::new(key.clone(), now_millis));
        Ok(InsertOutcome::Inserted)
    }

    async fn totals(&self, page_type: PageType, slug: &str) -> StoreResult<ViewTotals> {
        self.check_online()?;
        Ok(sum(&self.matching(|r| r.page_type == page_type && r.slug == slug)))
    }

    async fn totals_by_page_type(&self, since: Option<&str>) -> StoreResult<Vec<PageTypeTotals>> {
        self.check_online()?;
        let mut groups: BTreeMap<PageType, Vec<ViewRecord>> = BTreeMap::new();
        for r in self.matching(|r| since_ok(r, since)) {
            groups.entry(r.page_type).or_default().push(r);
        }

        Ok(groups
            .into_iter()
            .map(|(page_type, rs)| PageTypeTotals {
                page_type,
                totals: sum(&rs),
            })
            .collect())
    }

    async fn top_slugs(
        &self,
        page_type: Option<PageType>,
        since: Option<&str>,
        limit: u32,
    ) -> StoreResult<Vec<SlugTotals>> {
        self.check_online()?;
        let mut groups: BTreeMap<(PageType, String), Vec<ViewRecord>> = BTreeMap::new();
        for r in self.matching(|r| page_type.is_none_or(|pt| r.page_type == pt) && since_ok(r, since)) {
            groups.entry((r.page_type, r.slug.clone())).or_default().push(r);
        }

        let mut top: Vec<SlugTotals> = groups
            .into_iter()
            .map(|((page_type, slug), rs)| SlugTotals {
                page_type,
                slug,
                totals: sum(&rs),
            })
            .collect();
        top.sort_by(|a, b| {
            b.totals
                .unique_views
                .cmp(&a.totals.unique_views)
                .then_with(|| a.slug.cmp(&b.slug))
                .then_with(|| a.page_type.as_str().cmp(b.page_type.as_str()))
        });
        top.truncate(limit as usize);
        Ok(top)
    }

    async fn daily_totals(
        &self,
        page_type: PageType,
        slug: Option<&str>,
        since: &str,
    ) -> StoreResult<Vec<DailyTotals>> {
        self.check_online()?;
        let mut groups: BTreeMap<String, Vec<ViewRecord>> = BTreeMap::new();
        for r in self.matching(|r| {
            r.page_type == page_type
                && slug.is_none_or(|s| r.slug == s)
                && since_ok(r, Some(since))
        }) {
            groups.entry(r.view_date.clone()).or_default().push(r);
        }

        Ok(groups
            .into_iter()
            .map(|(view_date, rs)| DailyTotals {
                view_date,
                totals: sum(&rs),
            })
            .collect())
    }
}
