// Worker implementations

use crate::config::Config;
use crate::db::FileOperations;
use crate::llm::LLM;
use crate::pipeline;
use crate::queue::jobs::ProcessFileJob;
use crate::storage;
use crate::types::{AppError, AppResult, JobStatus, LLMMessage, LLMRequest};
use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{error, info};

const ROAST_PROMPT: &str = "Based on the resume below, Roast this resume.";

pub struct Worker {
    pool: SqlitePool,
    config: Config,
    llm: Arc<LLM>,
}

impl Worker {
    pub fn new(pool: SqlitePool, config: Config, llm: Arc<LLM>) -> Self {
        Self { pool, config, llm }
    }

    /// Run one job to completion. Pipeline errors land the record in the
    /// terminal `failed` state instead of leaving it stuck mid-stage.
    pub async fn process_job(&self, job: ProcessFileJob) {
        info!(file_id = %job.file_id, "processing job");

        if let Err(e) = self.run_pipeline(&job).await {
            error!(file_id = %job.file_id, error = %e, "job failed");
            if let Err(db_err) =
                FileOperations::fail_file(&self.pool, &job.file_id, &e.to_string()).await
            {
                error!(file_id = %job.file_id, error = %db_err, "could not record failure");
            }
        }
    }

    async fn run_pipeline(&self, job: &ProcessFileJob) -> AppResult<()> {
        let pool = &self.pool;
        let id = &job.file_id;

        FileOperations::update_status(pool, id, JobStatus::Processing).await?;
        FileOperations::update_status(pool, id, JobStatus::ConvertingToImages).await?;

        let images_dir =
            storage::images_dir(Path::new(&self.config.storage.upload_root), id);
        let pages = pipeline::render_to_jpegs(
            &job.file_path,
            &images_dir,
            self.config.worker.max_rendered_pixels,
        )
        .await?;
        info!(file_id = %id, pages = pages.len(), "rasterization complete");

        FileOperations::update_status(pool, id, JobStatus::ConvertingToImagesSuccess).await?;

        let mut pages_b64 = Vec::with_capacity(pages.len());
        for page in &pages {
            pages_b64.push(pipeline::encode_image(page).await?);
        }

        let request = build_roast_request(&self.config.llm.model, &pages_b64)?;
        let response = self.llm.create_chat_completion(&request).await?;
        info!(
            file_id = %id,
            tokens = response.usage.total_tokens,
            "roast received"
        );

        FileOperations::complete_file(pool, id, &response.content).await?;

        Ok(())
    }
}

/// Build the chat-completion request: the fixed roast instruction plus the
/// first page image. Multi-page documents still send exactly one image.
fn build_roast_request(model: &str, pages_b64: &[String]) -> AppResult<LLMRequest> {
    let first = pages_b64
        .first()
        .ok_or_else(|| AppError::Render("document produced no pages".to_string()))?;

    Ok(LLMRequest {
        model: model.to_string(),
        messages: vec![LLMMessage::user_with_base64_image(
            ROAST_PROMPT,
            first.clone(),
            "image/jpeg",
        )],
        max_tokens: None,
        temperature: None,
    })
}

/// Spawn `count` workers draining a shared receiver. Each worker runs its
/// job sequentially to completion; there is no retry and no cancellation.
pub fn spawn_workers(
    worker: Arc<Worker>,
    receiver: mpsc::Receiver<ProcessFileJob>,
    count: usize,
) {
    let receiver = Arc::new(Mutex::new(receiver));

    for i in 0..count {
        let worker = worker.clone();
        let receiver = receiver.clone();

        tokio::spawn(async move {
            info!(worker = i, "worker started");
            loop {
                // Lock only for the dequeue so workers pull jobs independently
                let job = { receiver.lock().await.recv().await };
                match job {
                    Some(job) => worker.process_job(job).await,
                    None => {
                        info!(worker = i, "job queue closed, worker exiting");
                        break;
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        DatabaseConfig, LLMConfig, ServerConfig, StorageConfig, WorkerConfig,
    };
    use sqlx::sqlite::SqlitePoolOptions;
    use tempfile::TempDir;

    fn test_config(upload_root: &std::path::Path) -> Config {
        Config {
            server: ServerConfig {
                port: 0,
                host: "127.0.0.1".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            storage: StorageConfig {
                upload_root: upload_root.display().to_string(),
            },
            llm: LLMConfig {
                provider: "gemini".to_string(),
                api_key: "test-key".to_string(),
                base_url: "http://localhost:9".to_string(),
                model: "gemini-2.0-flash".to_string(),
            },
            worker: WorkerConfig {
                count: 1,
                queue_size: 8,
                max_rendered_pixels: 1024,
            },
        }
    }

    #[tokio::test]
    async fn test_pipeline_error_marks_job_failed() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();

        let upload_dir = TempDir::new().unwrap();
        let config = test_config(upload_dir.path());
        let llm = Arc::new(LLM::new(&config.llm).unwrap());
        let worker = Worker::new(pool.clone(), config, llm);

        let job = FileOperations::insert_file(&pool, "ghost.pdf").await.unwrap();
        FileOperations::update_status(&pool, &job.id, JobStatus::Queued)
            .await
            .unwrap();

        // The stored path never existed, so rendering fails before the LLM call
        worker
            .process_job(ProcessFileJob {
                file_id: job.id.clone(),
                file_path: upload_dir.path().join(&job.id).join("ghost.pdf"),
            })
            .await;

        let fetched = FileOperations::get_file(&pool, &job.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, JobStatus::Failed);
        assert!(fetched.error.is_some());
        assert!(fetched.result.is_none());
    }

    #[test]
    fn test_roast_request_sends_exactly_one_image() {
        // Three rendered pages, one image on the wire
        let pages = vec![
            "cGFnZTA=".to_string(),
            "cGFnZTE=".to_string(),
            "cGFnZTI=".to_string(),
        ];
        let request = build_roast_request("gemini-2.0-flash", &pages).unwrap();

        assert_eq!(request.messages.len(), 1);
        let message = &request.messages[0];
        assert_eq!(message.role, "user");
        assert_eq!(message.content.image_count(), 1);
        assert_eq!(message.content.as_text(), Some(ROAST_PROMPT));

        // The one image must be the first page
        let json = serde_json::to_value(&message.content).unwrap();
        assert_eq!(json[1]["base64"], "cGFnZTA=");
        assert_eq!(json[1]["media_type"], "image/jpeg");
    }

    #[test]
    fn test_roast_request_rejects_empty_document() {
        assert!(build_roast_request("gemini-2.0-flash", &[]).is_err());
    }
}
