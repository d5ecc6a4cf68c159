use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::db::store::StoreError;

/// Errors surfaced by the view service to HTTP clients.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("storage error: {0:#}")]
    Storage(anyhow::Error),
}

impl From<StoreError> for ViewError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey => {
                ViewError::Storage(anyhow::anyhow!("unexpected duplicate key"))
            }
            StoreError::Other(e) => ViewError::Storage(e),
        }
    }
}

impl ResponseError for ViewError {
    fn status_code(&self) -> StatusCode {
        match self {
            ViewError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ViewError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ViewError::InvalidArgument(msg) => msg.clone(),
            ViewError::Storage(e) => {
                // Detail stays in the server log
                log::error!("Storage failure: {:#}", e);
                "Internal server error".to_string()
            }
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "message": message
        }))
    }
}
