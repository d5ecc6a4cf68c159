use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ViewError;

/// Coarse content category used to namespace view counts.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    Homepage,
    Blog,
    Place,
}

impl PageType {
    pub fn all() -> [PageType; 3] {
        [PageType::Homepage, PageType::Blog, PageType::Place]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::Homepage => "homepage",
            PageType::Blog => "blog",
            PageType::Place => "place",
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageType {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(ViewError::InvalidArgument(
                "page_type is required".to_string(),
            )),
            "homepage" => Ok(PageType::Homepage),
            "blog" => Ok(PageType::Blog),
            "place" => Ok(PageType::Place),
            other => Err(ViewError::InvalidArgument(format!(
                "unknown page_type '{}'",
                other
            ))),
        }
    }
}

/// Identity of one unique visitor-day for a page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewKey {
    pub page_type: PageType,
    pub slug: String,
    pub ip_address: String,
    pub view_date: String, // YYYY-MM-DD in UTC+7
}

/// Stored document in the `page_views` collection.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ViewRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub page_type: PageType,
    pub slug: String,
    pub ip_address: String,
    pub view_date: String,
    pub view_count: i64,
    pub created_at: i64, // milliseconds since epoch
    pub updated_at: i64,
}

impl ViewRecord {
    pub fn new(key: ViewKey, now_millis: i64) -> Self {
        Self {
            id: None,
            page_type: key.page_type,
            slug: key.slug,
            ip_address: key.ip_address,
            view_date: key.view_date,
            view_count: 1,
            created_at: now_millis,
            updated_at: now_millis,
        }
    }
}
