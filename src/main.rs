//! Taskboard API server.
//!
//! # Environment Variables
//!
//! - `STORAGE_MODE`: `json_file` (default) | `in_memory`
//! - `DATA_FILE`: Path of the JSON data file (default: `data.json`)
//! - `RUST_LOG`: Logging level (e.g., `debug`, `info`, `taskboard=debug`)
//! - `HOST`: Server host address (default: `0.0.0.0`)
//! - `PORT`: Server port (default: `5000`)
//! - `WORKER_THREADS`: Number of tokio worker threads (default: logical CPU count)

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskboard::api::{AppState, create_router};
use taskboard::infrastructure::{AppConfig, Repository};
use taskboard::server::Server;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!("Configuration error: {}", error);
            std::process::exit(1);
        }
    };

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(threads) = config.worker_threads {
        builder.worker_threads(threads);
    }

    builder.build()?.block_on(serve(config))
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!(
        storage_mode = ?config.storage_mode,
        data_file = %config.data_file.display(),
        worker_threads = ?config.worker_threads,
        "Starting Taskboard API"
    );

    let repository = Repository::open(config.create_store());
    let (tasks, comments) = repository.counts();
    tracing::info!(tasks, comments, "Repository loaded");

    let router = create_router(AppState::new(repository));

    Server::from_config(&config).run(router).await
}
