mod config;
mod db;
mod error;
mod handlers;
mod middlewares;
mod models;
mod routes;
mod services;
mod state;
mod structs;
mod utils;

use crate::config::Settings;
use crate::db::mongodb::{MongoViewStore, get_database};
use crate::services::view_tracker::ViewTracker;
use crate::state::app_state::AppState;
use actix_cors::Cors;
use actix_web::{App, HttpServer, http, middleware::Logger, web};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use routes::init_routes;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize the database connection
    let db = match get_database(&settings).await {
        Ok(db) => db,
        Err(e) => {
            error!("Error connecting to the database: {:#}", e);
            std::process::exit(1);
        }
    };

    // The unique visit-key index is what keeps one record per visitor-day
    let store = MongoViewStore::new(&db);
    if let Err(e) = store.ensure_indexes().await {
        error!("Error preparing the page_views collection: {:#}", e);
        std::process::exit(1);
    }

    if settings.ip_salt.is_some() {
        info!("Visitor IP addresses will be stored hashed");
    }

    // Create shared state
    let app_state = web::Data::new(AppState {
        views: ViewTracker::new(Arc::new(store), settings.ip_salt.clone()),
        jwt_secret: settings.jwt_secret.clone(),
    });

    let origins = settings.cors_origins.clone();
    info!(
        "Listening on {}:{}",
        settings.bind_address, settings.port
    );

    HttpServer::new(move || {
        let logger = Logger::new("%a \"%r\" %s %b \"%{Referer}i\" \"%{User-Agent}i\" %D ms");
        let cors = origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![http::header::AUTHORIZATION, http::header::ACCEPT])
            .allowed_header(http::header::CONTENT_TYPE)
            .max_age(3600);
        App::new()
            .wrap(logger)
            .wrap(cors)
            .app_data(app_state.clone())
            .configure(init_routes)
    })
    .bind((settings.bind_address.as_str(), settings.port))?
    .run()
    .await
}
