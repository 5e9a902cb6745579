//! Attendance plan HTTP server binary.
//!
//! Initializes the repository, sets up the HTTP router and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! SESSION_SECRET_KEY=change-me cargo run --bin attendance-plan-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `SESSION_SECRET_KEY`: Secret used to sign session tokens (required)
//! - `SESSION_TOKEN_LIFE_TIME`: Token lifetime in days (default: 30)
//! - `REPOSITORY_TYPE`: Storage backend (default: local, or `repository.toml` if present)
//! - `RUST_LOG`: Log filter directives, e.g. `attendance_plan=debug,tower_http=info` (default: info)

use std::env;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use attendance_plan::config::ServerConfig;
use attendance_plan::db::{FullRepository, RepositoryConfig, RepositoryError, RepositoryFactory};
use attendance_plan::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting attendance plan server");

    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    let sessions = config.session_tokens()?;
    info!(
        "Session tokens expire after {} day(s)",
        sessions.lifetime().num_days()
    );

    let repository = create_repository().context("Failed to initialize repository")?;
    info!("Repository initialized successfully");

    let app = create_router(AppState::new(repository, sessions));

    let addr = config.bind_address()?;
    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `REPOSITORY_TYPE` wins over `repository.toml`; with neither, use local storage.
fn create_repository() -> Result<Arc<dyn FullRepository>, RepositoryError> {
    if env::var("REPOSITORY_TYPE").is_err() {
        if let Some(path) = RepositoryConfig::default_path() {
            info!("Reading repository settings from {}", path.display());
            return RepositoryFactory::from_config_file(path);
        }
    }
    RepositoryFactory::from_env()
}
