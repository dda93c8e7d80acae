use crate::models::FileJob;
use crate::types::{AppResult, JobStatus};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

pub struct FileOperations;

impl FileOperations {
    /// Insert a fresh record in the `saving` state and return it.
    pub async fn insert_file(pool: &SqlitePool, name: &str) -> AppResult<FileJob> {
        let job = FileJob {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            status: JobStatus::Saving,
            result: None,
            error: None,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO files (id, name, status, result, error, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&job.id)
        .bind(&job.name)
        .bind(job.status)
        .bind(&job.result)
        .bind(&job.error)
        .bind(job.created_at)
        .execute(pool)
        .await?;

        Ok(job)
    }

    pub async fn get_file(pool: &SqlitePool, id: &str) -> AppResult<Option<FileJob>> {
        let job = sqlx::query_as::<_, FileJob>(
            "SELECT id, name, status, result, error, created_at FROM files WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(job)
    }

    /// Single-row UPDATE is the only mutation; last write wins.
    pub async fn update_status(pool: &SqlitePool, id: &str, status: JobStatus) -> AppResult<()> {
        sqlx::query("UPDATE files SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .execute(pool)
            .await?;

        Ok(())
    }

    pub async fn complete_file(pool: &SqlitePool, id: &str, result: &str) -> AppResult<()> {
        sqlx::query("UPDATE files SET status = ?2, result = ?3 WHERE id = ?1")
            .bind(id)
            .bind(JobStatus::Processed)
            .bind(result)
            .execute(pool)
            .await?;

        Ok(())
    }

    pub async fn fail_file(pool: &SqlitePool, id: &str, error: &str) -> AppResult<()> {
        sqlx::query("UPDATE files SET status = ?2, error = ?3 WHERE id = ?1")
            .bind(id)
            .bind(JobStatus::Failed)
            .bind(error)
            .execute(pool)
            .await?;

        Ok(())
    }
}
