use resume_roaster::llm::LLM;
use resume_roaster::queue::{workers, workers::Worker, JobQueue};
use resume_roaster::{config::Config, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "resume_roaster=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);

    // Connect to database
    let pool = resume_roaster::db::create_pool(&config.database).await?;

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
    info!("Database migrations completed");

    // Shared clients are built once here and handed to the workers
    let llm = Arc::new(LLM::new(&config.llm)?);
    let (queue, receiver) = JobQueue::new(config.worker.queue_size);
    let worker = Arc::new(Worker::new(pool.clone(), config.clone(), llm));
    workers::spawn_workers(worker, receiver, config.worker.count);
    info!("Started {} workers", config.worker.count);

    // Create shared state
    let state = AppState {
        pool,
        config: config.clone(),
        queue,
    };

    // Create router
    let app = resume_roaster::create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
