use serde::{Deserialize, Serialize};

/// Missing fields deserialize as empty so they are reported as invalid arguments
#[derive(Deserialize)]
pub struct TrackViewRequest {
    #[serde(default)]
    pub page_type: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Serialize)]
pub struct TrackViewResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Deserialize)]
pub struct ViewCountParams {
    #[serde(default)]
    pub page_type: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Serialize)]
pub struct ViewCountResponse {
    pub success: bool,
    pub unique_views: i64,
    pub total_views: i64,
}
