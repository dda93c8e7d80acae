use anyhow::Result;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub llm: LLMConfig,
    pub worker: WorkerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Uploaded originals land in `{upload_root}/{id}/{name}`, rendered
    /// pages in `{upload_root}/images/{id}/image-{i}.jpg`.
    pub upload_root: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    pub provider: String,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkerConfig {
    pub count: usize,
    pub queue_size: usize,
    /// Longest-edge pixel cap for rendered pages.
    pub max_rendered_pixels: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite://resume_roaster.db?mode=rwc".to_string()),
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()?,
            },
            storage: StorageConfig {
                upload_root: env::var("UPLOAD_ROOT")
                    .unwrap_or_else(|_| "/mnt/uploads".to_string()),
            },
            llm: LLMConfig {
                provider: env::var("LLM_PROVIDER").unwrap_or_else(|_| "gemini".to_string()),
                api_key: env::var("GOOGLE_API_KEY").unwrap_or_default(),
                base_url: env::var("LLM_BASE_URL").unwrap_or_else(|_| {
                    crate::llm::gemini::GEMINI_OPENAI_API_BASE.to_string()
                }),
                model: env::var("LLM_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            },
            worker: WorkerConfig {
                count: env::var("WORKER_COUNT")
                    .unwrap_or_else(|_| "2".to_string())
                    .parse()?,
                queue_size: env::var("JOB_QUEUE_SIZE")
                    .unwrap_or_else(|_| "64".to_string())
                    .parse()?,
                max_rendered_pixels: env::var("MAX_RENDERED_PIXELS")
                    .unwrap_or_else(|_| "2048".to_string())
                    .parse()?,
            },
        })
    }
}
