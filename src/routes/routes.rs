use actix_web::web;

use crate::error::ViewError;
use crate::handlers::admin_handlers::{daily_views, top_pages, views_summary};
use crate::handlers::health_handlers::health_check;
use crate::handlers::view_handlers::{get_view_count, track_view};
use crate::middlewares::authmw::{JwtAuth, RequireRoles};
use crate::models::role::Role;

/// Configure the routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // Malformed bodies and query strings get the same JSON error shape as handler errors
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ViewError::InvalidArgument(format!("Invalid request body: {}", err)).into()
    }));
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        ViewError::InvalidArgument(format!("Invalid query string: {}", err)).into()
    }));

    cfg.route("/health", web::get().to(health_check));

    // Public analytics routes, called from every page render
    cfg.service(
        web::scope("/views")
            .route("/track", web::post().to(track_view))
            .route("/count", web::get().to(get_view_count)),
    );

    // Admin panel - wraps run bottom-up, so the token is checked before the role
    cfg.service(
        web::scope("/admin")
            .wrap(RequireRoles(vec![Role::Admin]))
            .wrap(JwtAuth)
            .route("/views/summary", web::get().to(views_summary))
            .route("/views/top", web::get().to(top_pages))
            .route("/views/daily", web::get().to(daily_views)),
    );
}
