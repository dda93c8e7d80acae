use crate::db::FileOperations;
use crate::models::{AppState, FileStatusResponse, UploadResponse};
use crate::queue::jobs::ProcessFileJob;
use crate::storage;
use crate::types::{AppError, AppResult, JobStatus};
use axum::{
    extract::{Multipart, Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::info;
use uuid::Uuid;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/upload", post(upload_file))
        .route("/{id}", get(get_file_by_id))
        .with_state(state)
}

/// Create a job for the uploaded file: record in `saving`, bytes on disk,
/// job on the queue, record to `queued`, id back to the client.
async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("malformed multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .map(|s| s.to_string())
                .ok_or_else(|| AppError::InvalidRequest("file field has no filename".to_string()))?;
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidRequest(format!("failed to read upload: {}", e)))?;
            upload = Some((filename, data));
            break;
        }
    }

    let (filename, data) =
        upload.ok_or_else(|| AppError::InvalidRequest("missing multipart field 'file'".to_string()))?;
    if data.is_empty() {
        return Err(AppError::InvalidRequest("uploaded file is empty".to_string()));
    }
    let filename = storage::sanitize_filename(&filename)?;

    info!(name = %filename, size = data.len(), "file upload received");

    let job = FileOperations::insert_file(&state.pool, &filename).await?;

    let path = storage::upload_path(
        std::path::Path::new(&state.config.storage.upload_root),
        &job.id,
        &filename,
    );
    if let Err(e) = storage::save_to_disk(&path, &data).await {
        // Never enqueue a job whose bytes did not make it to disk
        FileOperations::fail_file(&state.pool, &job.id, &e.to_string()).await?;
        return Err(e);
    }

    state
        .queue
        .enqueue(ProcessFileJob {
            file_id: job.id.clone(),
            file_path: path,
        })
        .await?;

    FileOperations::update_status(&state.pool, &job.id, JobStatus::Queued).await?;

    info!(file_id = %job.id, "file queued for processing");

    Ok(Json(UploadResponse { file_id: job.id }))
}

async fn get_file_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<FileStatusResponse>> {
    // Malformed ids surface as not-found, same as unknown ones
    let uuid = id
        .parse::<Uuid>()
        .map_err(|_| AppError::NotFound(format!("unknown file id: {}", id)))?;

    let job = FileOperations::get_file(&state.pool, &uuid.to_string())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("unknown file id: {}", id)))?;

    Ok(Json(job.into()))
}
