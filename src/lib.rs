// Resume Roaster - upload a resume PDF, poll for its AI-generated roast

pub mod config;
pub mod db;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod queue;
pub mod routes;
pub mod storage;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
