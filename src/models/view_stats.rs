use serde::Serialize;

use crate::models::page_view::PageType;

/// Aggregate counts over a set of view records.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewTotals {
    pub unique_views: i64, // Number of distinct visitor-days
    pub total_views: i64,  // Sum of viewCount
}

impl ViewTotals {
    pub fn add(&mut self, other: ViewTotals) {
        self.unique_views += other.unique_views;
        self.total_views += other.total_views;
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PageTypeTotals {
    pub page_type: PageType,
    #[serde(flatten)]
    pub totals: ViewTotals,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SlugTotals {
    pub page_type: PageType,
    pub slug: String,
    #[serde(flatten)]
    pub totals: ViewTotals,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DailyTotals {
    pub view_date: String,
    #[serde(flatten)]
    pub totals: ViewTotals,
}

/// Per page type breakdown for the admin dashboard.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ViewSummary {
    pub since: Option<String>,
    pub page_types: Vec<PageTypeTotals>,
    pub overall: ViewTotals,
}
