use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;

use crate::error::ViewError;
use crate::state::app_state::AppState;
use crate::structs::view_request::{
    TrackViewRequest, TrackViewResponse, ViewCountParams, ViewCountResponse,
};
use crate::utils::client_ip::client_ip;

/// Record a page view for the calling visitor
pub async fn track_view(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    web::Json(body): web::Json<TrackViewRequest>,
) -> Result<HttpResponse, ViewError> {
    let ip = client_ip(&req);

    let result = app_state
        .views
        .record_view(&body.page_type, &body.slug, &ip, Utc::now())
        .await?;

    let message = if result.tracked {
        "View tracked"
    } else {
        "View already tracked today"
    };

    Ok(HttpResponse::Ok().json(TrackViewResponse {
        success: true,
        message: message.to_string(),
    }))
}

/// Unique and total views for one page
pub async fn get_view_count(
    app_state: web::Data<AppState>,
    query: web::Query<ViewCountParams>,
) -> Result<HttpResponse, ViewError> {
    let totals = app_state
        .views
        .view_count(&query.page_type, &query.slug)
        .await?;

    Ok(HttpResponse::Ok().json(ViewCountResponse {
        success: true,
        unique_views: totals.unique_views,
        total_views: totals.total_views,
    }))
}
