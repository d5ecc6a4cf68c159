use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::view_stats::{DailyTotals, PageTypeTotals, SlugTotals, ViewTotals};

pub const DEFAULT_TOP_LIMIT: u32 = 10;
pub const DEFAULT_DAILY_DAYS: u32 = 30;

#[derive(Deserialize, Validate)]
pub struct SummaryParams {
    #[validate(range(min = 1, max = 365, message = "days must be between 1 and 365"))]
    pub days: Option<u32>,
}

#[derive(Deserialize, Validate)]
pub struct TopPagesParams {
    pub page_type: Option<String>,
    #[validate(range(min = 1, max = 365, message = "days must be between 1 and 365"))]
    pub days: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<u32>,
}

#[derive(Deserialize, Validate)]
pub struct DailyParams {
    #[validate(length(min = 1, message = "page_type is required"))]
    #[serde(default)]
    pub page_type: String,
    pub slug: Option<String>,
    #[validate(range(min = 1, max = 365, message = "days must be between 1 and 365"))]
    pub days: Option<u32>,
}

#[derive(Serialize)]
pub struct SummaryResponse {
    pub success: bool,
    pub since: Option<String>,
    pub page_types: Vec<PageTypeTotals>,
    pub overall: ViewTotals,
}

#[derive(Serialize)]
pub struct TopPagesResponse {
    pub success: bool,
    pub pages: Vec<SlugTotals>,
}

#[derive(Serialize)]
pub struct DailyResponse {
    pub success: bool,
    pub days: Vec<DailyTotals>,
}
