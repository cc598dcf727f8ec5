//! Mock marketplace backend.
//!
//! Serves the REST surface the dashboard consumes, backed by seeded
//! in-memory state. A stand-in for the real backend during development.

mod routes;
mod state;

use ledgerwatch_core::config::Config;
use state::MockState;
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load_or_default();
    let state = Arc::new(Mutex::new(MockState::seed()));
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&config.mock_listen).await?;
    info!(listen = %config.mock_listen, "mock backend listening");
    axum::serve(listener, app).await?;
    Ok(())
}
