use crate::services::view_tracker::ViewTracker;

pub struct AppState {
    pub views: ViewTracker,
    pub jwt_secret: String, // Shared with the site's auth provider
}
