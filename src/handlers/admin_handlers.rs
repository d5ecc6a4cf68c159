use actix_web::{HttpResponse, web};
use chrono::Utc;
use validator::Validate;

use crate::error::ViewError;
use crate::state::app_state::AppState;
use crate::structs::admin_request::{
    DEFAULT_DAILY_DAYS, DEFAULT_TOP_LIMIT, DailyParams, DailyResponse, SummaryParams,
    SummaryResponse, TopPagesParams, TopPagesResponse,
};

fn validate<T: Validate>(params: &T) -> Result<(), ViewError> {
    params
        .validate()
        .map_err(|errors| ViewError::InvalidArgument(errors.to_string()))
}

/// Views per page type for the admin dashboard
pub async fn views_summary(
    app_state: web::Data<AppState>,
    query: web::Query<SummaryParams>,
) -> Result<HttpResponse, ViewError> {
    validate(&*query)?;

    let summary = app_state.views.summary(query.days, Utc::now()).await?;

    Ok(HttpResponse::Ok().json(SummaryResponse {
        success: true,
        since: summary.since,
        page_types: summary.page_types,
        overall: summary.overall,
    }))
}

/// Most viewed pages
pub async fn top_pages(
    app_state: web::Data<AppState>,
    query: web::Query<TopPagesParams>,
) -> Result<HttpResponse, ViewError> {
    validate(&*query)?;

    let page_type = query.page_type.as_deref().filter(|p| !p.trim().is_empty());
    let pages = app_state
        .views
        .top_pages(
            page_type,
            query.days,
            query.limit.unwrap_or(DEFAULT_TOP_LIMIT),
            Utc::now(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(TopPagesResponse {
        success: true,
        pages,
    }))
}

/// Day-by-day views for a page type, or a single page when `slug` is given
pub async fn daily_views(
    app_state: web::Data<AppState>,
    query: web::Query<DailyParams>,
) -> Result<HttpResponse, ViewError> {
    validate(&*query)?;

    let days = app_state
        .views
        .daily(
            &query.page_type,
            query.slug.as_deref(),
            query.days.unwrap_or(DEFAULT_DAILY_DAYS),
            Utc::now(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(DailyResponse {
        success: true,
        days,
    }))
}
