use crate::models::HealthResponse;
use axum::{routing::get, Json, Router};

pub fn router() -> Router {
    Router::new().route("/", get(health_check))
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Server is up and running".to_string(),
    })
}
