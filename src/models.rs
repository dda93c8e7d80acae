use crate::config::Config;
use crate::queue::JobQueue;
use crate::types::JobStatus;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub queue: JobQueue,
}

// Note: FromRow is needed for runtime query_as (without DATABASE_URL at compile time)

/// One uploaded-document processing request, as stored in the `files` table.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct FileJob {
    pub id: String,
    pub name: String,
    pub status: JobStatus,
    pub result: Option<String>,
    pub error: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// API Request/Response types

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct UploadResponse {
    pub file_id: String,
}

/// Wire shape for GET /{id}; `result` stays null until processing completes.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct FileStatusResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub status: JobStatus,
    pub result: Option<String>,
}

impl From<FileJob> for FileStatusResponse {
    fn from(job: FileJob) -> Self {
        Self {
            id: job.id,
            name: job.name,
            status: job.status,
            result: job.result,
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
