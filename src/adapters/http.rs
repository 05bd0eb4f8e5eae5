use crate::core::search::SearchEngine;
use crate::domain::model::{ErrorBody, PackageRecord, SearchResponse};
use crate::domain::ports::ModelClient;
use crate::utils::error::{ErrorCategory, ScoutError};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

pub struct AppState<M: ModelClient> {
    pub engine: Arc<SearchEngine<M>>,
    pub request_timeout: Duration,
}

impl<M: ModelClient> Clone for AppState<M> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            request_timeout: self.request_timeout,
        }
    }
}

pub fn create_router<M: ModelClient + 'static>(state: AppState<M>) -> Router {
    Router::new()
        .route("/health", get(health::<M>))
        .route("/api/packages", get(list_packages::<M>))
        .route("/api/search", post(search::<M>))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn health<M: ModelClient + 'static>(State(state): State<AppState<M>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "inventory_size": state.engine.inventory().len(),
    }))
}

async fn list_packages<M: ModelClient + 'static>(
    State(state): State<AppState<M>>,
) -> Json<Vec<PackageRecord>> {
    Json(state.engine.inventory().all().to_vec())
}

async fn search<M: ModelClient + 'static>(
    State(state): State<AppState<M>>,
    body: Bytes,
) -> Result<Json<SearchResponse>, ScoutError> {
    let body: Value = serde_json::from_slice(&body)
        .map_err(|_| ScoutError::bad_request("Request body must be a JSON object"))?;

    // Dropping the future on expiry cancels the in-flight provider call.
    match tokio::time::timeout(state.request_timeout, state.engine.handle(&body)).await {
        Ok(result) => result.map(Json),
        Err(_) => Err(ScoutError::timed_out(state.request_timeout)),
    }
}

fn log_failure(err: &ScoutError) {
    match err {
        ScoutError::UpstreamAuth { status, message } => tracing::error!(
            "Provider rejected credentials (HTTP {}), check OPENAI_API_KEY: {}",
            status,
            message
        ),
        ScoutError::Upstream { status, message } => {
            tracing::warn!("Provider call failed (status {:?}): {}", status, message)
        }
        ScoutError::MalformedJson { message } => {
            tracing::error!("Model returned non-JSON output: {}", message)
        }
        ScoutError::SchemaViolation { violations } => {
            let listed: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
            tracing::error!(
                "Model output failed schema validation: [{}]",
                listed.join("; ")
            )
        }
        other if other.category() == ErrorCategory::Client => {
            tracing::info!("Rejected search request: {}", other)
        }
        other => tracing::error!("Search failed: {}", other),
    }
}

impl IntoResponse for ScoutError {
    fn into_response(self) -> Response {
        log_failure(&self);

        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            error: self.public_message(),
            details: self.details(),
        };

        (status, Json(body)).into_response()
    }
}
