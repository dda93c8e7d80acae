//! API Routes
//!
//! This module organizes all HTTP endpoints for the application:
//! - `GET /` - Health check
//! - `POST /upload` - File upload; creates a job and returns its id
//! - `GET /{id}` - Job status and result lookup

pub mod files;
pub mod health;

use crate::models::AppState;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Upload cap; resume PDFs are small, anything bigger is a mistake.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    Router::new()
        .merge(health::router())
        .merge(files::router(state))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
}
