use crate::adapters::http::{create_router, AppState};
use crate::adapters::openai::OpenAiClient;
use crate::core::inventory::Inventory;
use crate::core::search::SearchEngine;
use crate::domain::model::SearchResponse;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, ScoutError};
use crate::utils::validation::validate_socket_addr;
use std::sync::Arc;

/// Load the inventory once and wire it to the configured provider.
pub fn build_engine(config: &dyn ConfigProvider) -> Result<SearchEngine<OpenAiClient>> {
    let inventory = Arc::new(Inventory::load(config.inventory_path())?);
    tracing::info!("Inventory ready with {} packages", inventory.len());

    let client = OpenAiClient::new(config.provider().clone());
    SearchEngine::new(inventory, client)
}

/// Serve until ctrl-c. `bind_override` wins over the configured address.
pub async fn serve(config: &dyn ConfigProvider, bind_override: Option<&str>) -> Result<()> {
    let bind = bind_override.unwrap_or(config.bind_addr());
    validate_socket_addr("bind", bind)?;

    let engine = build_engine(config)?;
    let router = create_router(AppState {
        engine: Arc::new(engine),
        request_timeout: config.request_timeout(),
    });

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(
        "🚀 Listening on {} (model {}, timeout {:?})",
        bind,
        config.provider().model,
        config.request_timeout()
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// One grounded search outside the HTTP layer, under the same timeout.
pub async fn search_once(config: &dyn ConfigProvider, query: &str) -> Result<SearchResponse> {
    let engine = build_engine(config)?;
    let timeout = config.request_timeout();
    tokio::time::timeout(timeout, engine.search(query))
        .await
        .unwrap_or_else(|_| Err(ScoutError::timed_out(timeout)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
