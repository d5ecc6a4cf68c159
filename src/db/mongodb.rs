use anyhow::{Context, Result};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use log::{info, warn};
use mongodb::bson::{Bson, Document, doc};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};

use crate::config::Settings;
use crate::db::store::{InsertOutcome, StoreError, StoreResult, ViewStore};
use crate::models::page_view::{PageType, ViewKey, ViewRecord};
use crate::models::view_stats::{DailyTotals, PageTypeTotals, SlugTotals, ViewTotals};

pub const PAGE_VIEWS_COLLECTION: &str = "page_views";
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Connect to MongoDB using the configured connection string
pub async fn get_database(settings: &Settings) -> Result<Database> {
    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .context("Failed to parse MongoDB connection string")?;

    let db = client.database(&settings.database_name);
    db.run_command(doc! { "ping": 1 })
        .await
        .context("MongoDB did not answer ping")?;

    info!("Connected to MongoDB database '{}'", settings.database_name);
    Ok(db)
}

pub struct MongoViewStore {
    db: Database,
    views: Collection<ViewRecord>,
}

impl MongoViewStore {
    pub fn new(db: &Database) -> Self {
        Self {
            db: db.clone(),
            views: db.collection::<ViewRecord>(PAGE_VIEWS_COLLECTION),
        }
    }

    /// Unique visit-key index plus a date index for the admin range queries
    pub async fn ensure_indexes(&self) -> Result<()> {
        let visit_key = IndexModel::builder()
            .keys(doc! { "pageType": 1, "slug": 1, "ipAddress": 1, "viewDate": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name(String::from("page_view_visit_key"))
                    .build(),
            )
            .build();

        let by_date = IndexModel::builder()
            .keys(doc! { "viewDate": 1, "pageType": 1 })
            .options(
                IndexOptions::builder()
                    .name(String::from("page_view_date"))
                    .build(),
            )
            .build();

        self.views
            .create_indexes([visit_key, by_date])
            .await
            .context("Failed to create page_views indexes")?;

        Ok(())
    }

    async fn aggregate(&self, pipeline: Vec<Document>) -> StoreResult<Vec<Document>> {
        let docs = self
            .views
            .aggregate(pipeline)
            .await
            .context("Failed to run page_views aggregation")?
            .try_collect::<Vec<Document>>()
            .await
            .context("Failed to read page_views aggregation")?;

        Ok(docs)
    }
}

#[async_trait]
impl ViewStore for MongoViewStore {
    async fn ping(&self) -> StoreResult<()> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .context("Database connection failed")?;
        Ok(())
    }

    async fn insert_if_absent(&self, key: &ViewKey, now_millis: i64) -> StoreResult<InsertOutcome> {
        let record = ViewRecord::new(key.clone(), now_millis);

        // Same-day repeats match the filter and $setOnInsert leaves them untouched
        let result = self
            .views
            .update_one(
                key_filter(key),
                doc! {
                    "$setOnInsert": {
                        "viewCount": record.view_count,
                        "createdAt": record.created_at,
                        "updatedAt": record.updated_at,
                    }
                },
            )
            .upsert(true)
            .await;

        match result {
            Ok(update) if update.upserted_id.is_some() => Ok(InsertOutcome::Inserted),
            Ok(_) => Ok(InsertOutcome::Existing),
            Err(e) if is_duplicate_key(&e) => Err(StoreError::DuplicateKey),
            Err(e) => Err(anyhow::Error::new(e)
                .context("Failed to upsert page view")
                .into()),
        }
    }

    async fn totals(&self, page_type: PageType, slug: &str) -> StoreResult<ViewTotals> {
        let pipeline = vec![
            doc! { "$match": { "pageType": page_type.as_str(), "slug": slug } },
            group_totals(Bson::Null),
        ];

        let docs = self.aggregate(pipeline).await?;
        Ok(docs.first().map(read_totals).unwrap_or_default())
    }

    async fn totals_by_page_type(&self, since: Option<&str>) -> StoreResult<Vec<PageTypeTotals>> {
        let pipeline = vec![
            doc! { "$match": match_filter(None, None, since) },
            group_totals(Bson::String("$pageType".to_string())),
            doc! { "$sort": { "_id": 1 } },
        ];

        let docs = self.aggregate(pipeline).await?;
        Ok(docs
            .iter()
            .filter_map(|d| {
                let page_type = parse_page_type(d.get_str("_id").ok()?)?;
                Some(PageTypeTotals {
                    page_type,
                    totals: read_totals(d),
                })
            })
            .collect())
    }

    async fn top_slugs(
        &self,
        page_type: Option<PageType>,
        since: Option<&str>,
        limit: u32,
    ) -> StoreResult<Vec<SlugTotals>> {
        let pipeline = vec![
            doc! { "$match": match_filter(page_type, None, since) },
            group_totals(Bson::Document(
                doc! { "pageType": "$pageType", "slug": "$slug" },
            )),
            doc! { "$sort": { "uniqueViews": -1, "_id.slug": 1, "_id.pageType": 1 } },
            doc! { "$limit": i64::from(limit) },
        ];

        let docs = self.aggregate(pipeline).await?;
        Ok(docs
            .iter()
            .filter_map(|d| {
                let id = d.get_document("_id").ok()?;
                Some(SlugTotals {
                    page_type: parse_page_type(id.get_str("pageType").ok()?)?,
                    slug: id.get_str("slug").ok()?.to_string(),
                    totals: read_totals(d),
                })
            })
            .collect())
    }

    async fn daily_totals(
        &self,
        page_type: PageType,
        slug: Option<&str>,
        since: &str,
    ) -> StoreResult<Vec<DailyTotals>> {
        let pipeline = vec![
            doc! { "$match": match_filter(Some(page_type), slug, Some(since)) },
            group_totals(Bson::String("$viewDate".to_string())),
            doc! { "$sort": { "_id": 1 } },
        ];

        let docs = self.aggregate(pipeline).await?;
        Ok(docs
            .iter()
            .filter_map(|d| {
                Some(DailyTotals {
                    view_date: d.get_str("_id").ok()?.to_string(),
                    totals: read_totals(d),
                })
            })
            .collect())
    }
}

fn key_filter(key: &ViewKey) -> Document {
    doc! {
        "pageType": key.page_type.as_str(),
        "slug": key.slug.as_str(),
        "ipAddress": key.ip_address.as_str(),
        "viewDate": key.view_date.as_str(),
    }
}

fn match_filter(page_type: Option<PageType>, slug: Option<&str>, since: Option<&str>) -> Document {
    let mut filter = Document::new();
    if let Some(page_type) = page_type {
        filter.insert("pageType", page_type.as_str());
    }
    if let Some(slug) = slug {
        filter.insert("slug", slug);
    }
    // viewDate is YYYY-MM-DD, so string order is date order
    if let Some(since) = since {
        filter.insert("viewDate", doc! { "$gte": since });
    }
    filter
}

fn group_totals(id: Bson) -> Document {
    doc! {
        "$group": {
            "_id": id,
            "uniqueViews": { "$sum": 1 },
            "totalViews": { "$sum": "$viewCount" },
        }
    }
}

fn read_totals(doc: &Document) -> ViewTotals {
    ViewTotals {
        unique_views: read_count(doc, "uniqueViews"),
        total_views: read_count(doc, "totalViews"),
    }
}

// $sum yields int32, int64 or double depending on magnitude and input types
fn read_count(doc: &Document, key: &str) -> i64 {
    match doc.get(key) {
        Some(Bson::Int32(v)) => i64::from(*v),
        Some(Bson::Int64(v)) => *v,
        Some(Bson::Double(v)) => *v as i64,
        _ => 0,
    }
}

fn parse_page_type(value: &str) -> Option<PageType> {
    match value.parse::<PageType>() {
        Ok(page_type) => Some(page_type),
        Err(_) => {
            warn!("Skipping page_views group with unknown pageType '{}'", value);
            None
        }
    }
}

fn is_duplicate_key(err: &MongoError) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_filter_uses_stored_field_names() {
        let key = ViewKey {
            page_type: PageType::Place,
            slug: "doi-suthep".to_string(),
            ip_address: "1.2.3.4".to_string(),
            view_date: "2024-01-02".to_string(),
        };

        let filter = key_filter(&key);
        assert_eq!(filter.get_str("pageType").unwrap(), "place");
        assert_eq!(filter.get_str("slug").unwrap(), "doi-suthep");
        assert_eq!(filter.get_str("ipAddress").unwrap(), "1.2.3.4");
        assert_eq!(filter.get_str("viewDate").unwrap(), "2024-01-02");
        assert_eq!(filter.len(), 4);
    }

    #[test]
    fn match_filter_only_includes_given_fields() {
        assert!(match_filter(None, None, None).is_empty());

        let filter = match_filter(Some(PageType::Blog), None, Some("2024-01-01"));
        assert_eq!(filter.get_str("pageType").unwrap(), "blog");
        assert!(!filter.contains_key("slug"));
        assert_eq!(
            filter.get_document("viewDate").unwrap().get_str("$gte").unwrap(),
            "2024-01-01"
        );
    }

    #[test]
    fn reads_counts_of_any_numeric_width() {
        let d = doc! { "uniqueViews": 3_i32, "totalViews": 5_000_000_000_i64 };
        assert_eq!(
            read_totals(&d),
            ViewTotals {
                unique_views: 3,
                total_views: 5_000_000_000
            }
        );
        assert_eq!(read_count(&doc! { "x": 2.0_f64 }, "x"), 2);
        assert_eq!(read_count(&doc! {}, "x"), 0);
    }
}
