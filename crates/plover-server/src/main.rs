mod configuration;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use plover::models::message::ExchangeMessage;
use plover::provider::StaticProvider;
use plover::store::MemoryStore;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::configuration::Settings;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let settings = Settings::new()?;

    // Offline wiring: in-memory persistence and a canned provider. Real
    // deployments swap these for durable and model-backed implementations.
    let state = AppState {
        store: Arc::new(MemoryStore::new()),
        provider: Arc::new(StaticProvider::new(vec![ExchangeMessage::assistant()
            .with_text("Hello! This server is running without a model provider.")])),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::configure(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(settings.server.socket_addr()).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
