use crate::core::inventory::Inventory;
use crate::core::prompt::PromptBuilder;
use crate::core::{reconcile, validator};
use crate::domain::model::SearchResponse;
use crate::domain::ports::ModelClient;
use crate::utils::error::{Result, ScoutError};
use serde_json::Value;
use std::sync::Arc;

/// Runs one grounded search per call: input check, prompt, model, validation,
/// reconciliation. Holds no per-request state, so one engine serves every
/// request concurrently.
pub struct SearchEngine<M: ModelClient> {
    inventory: Arc<Inventory>,
    prompts: PromptBuilder,
    model: M,
}

impl<M: ModelClient> SearchEngine<M> {
    pub fn new(inventory: Arc<Inventory>, model: M) -> Result<Self> {
        let prompts = PromptBuilder::new(&inventory)?;
        Ok(Self {
            inventory,
            prompts,
            model,
        })
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Entry point for a decoded request body such as `{"query": "..."}`.
    pub async fn handle(&self, body: &Value) -> Result<SearchResponse> {
        let query = match body.get("query") {
            Some(Value::String(query)) => query,
            _ => {
                return Err(ScoutError::bad_request(
                    "Query is required and must be a string",
                ))
            }
        };
        self.search(query).await
    }

    pub async fn search(&self, query: &str) -> Result<SearchResponse> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(ScoutError::bad_request("Query must not be empty"));
        }

        tracing::debug!("Searching inventory for: {}", trimmed);
        let prompt = self.prompts.build(trimmed);

        let raw = self.model.complete(&prompt).await?;
        tracing::debug!("Model returned {} bytes", raw.len());

        let response = validator::validate(&raw)?;
        let results = reconcile::reconcile(&response, &self.inventory);

        if results.is_empty() && !response.matches.is_empty() {
            tracing::warn!(
                "All {} model match(es) were outside the inventory",
                response.matches.len()
            );
        }
        tracing::info!(
            "Search returned {} result(s) from {} claim(s)",
            results.len(),
            response.matches.len()
        );

        Ok(SearchResponse {
            results,
            message: response.message,
            query: query.to_string(),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::inventory::record;
    use crate::domain::model::Prompt;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays a canned model answer and records every prompt it receives.
    pub(crate) struct StubModel {
        reply: std::result::Result<String, fn() -> ScoutError>,
        calls: AtomicUsize,
        last_prompt: Mutex<Option<Prompt>>,
    }

    impl StubModel {
        pub(crate) fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            }
        }

        pub(crate) fn failing(make: fn() -> ScoutError) -> Self {
            Self {
                reply: Err(make),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ModelClient for StubModel {
        async fn complete(&self, prompt: &Prompt) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(prompt.clone());
            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    fn engine(model: StubModel) -> SearchEngine<StubModel> {
        let inventory = Inventory::new(vec![
            record(1, "Beach", 100.0, &["beach"]),
            record(2, "Alps", 1500.0, &["hiking"]),
            record(3, "Rome", 650.0, &["history"]),
        ])
        .unwrap();
        SearchEngine::new(Arc::new(inventory), model).unwrap()
    }

    #[tokio::test]
    async fn test_empty_and_whitespace_queries_never_reach_model() {
        let engine = engine(StubModel::replying(r#"{"matches":[]}"#));
        for query in ["", "   ", "\n\t"] {
            let err = engine.search(query).await.unwrap_err();
            assert!(matches!(err, ScoutError::BadRequest { .. }));
            assert_eq!(err.status_code(), 400);
        }
        assert_eq!(engine.model.calls(), 0);
    }

    #[tokio::test]
    async fn test_handle_rejects_missing_or_non_string_query() {
        let engine = engine(StubModel::replying(r#"{"matches":[]}"#));
        for body in [json!({}), json!({"query": 42}), json!({"query": null}), json!("beach")] {
            let err = engine.handle(&body).await.unwrap_err();
            assert!(matches!(err, ScoutError::BadRequest { .. }), "{:?}", body);
        }
        assert_eq!(engine.model.calls(), 0);
    }

    #[tokio::test]
    async fn test_partial_grounding_and_echoed_query() {
        let engine = engine(StubModel::replying(
            r#"{"matches":[{"id":1,"reasoning":"sunny"},{"id":999,"reasoning":"fake"}]}"#,
        ));
        let response = engine.handle(&json!({"query": "  beach please "})).await.unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].id, 1);
        assert_eq!(response.query, "  beach please ");
        assert!(response.message.is_none());

        let prompt = engine.model.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.user.contains("\"beach please\""));
    }

    #[tokio::test]
    async fn test_no_match_message_passes_through() {
        let engine = engine(StubModel::replying(
            r#"{"matches":[],"message":"No beach packages under $50"}"#,
        ));
        let response = engine.search("beach under $50").await.unwrap();
        assert!(response.results.is_empty());
        assert_eq!(response.message.as_deref(), Some("No beach packages under $50"));
    }

    #[tokio::test]
    async fn test_model_output_failures_are_classified() {
        let malformed = engine(StubModel::replying("not json at all"));
        assert!(matches!(
            malformed.search("beach").await,
            Err(ScoutError::MalformedJson { .. })
        ));

        let invalid = engine(StubModel::replying(r#"{"matches":[{"id":"abc","reasoning":"x"}]}"#));
        let err = invalid.search("beach").await.unwrap_err();
        assert!(matches!(err, ScoutError::SchemaViolation { .. }));
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_upstream_errors_propagate_unchanged() {
        let engine = engine(StubModel::failing(|| ScoutError::UpstreamAuth {
            status: 401,
            message: "invalid key".to_string(),
        }));
        assert!(matches!(
            engine.search("beach").await,
            Err(ScoutError::UpstreamAuth { status: 401, .. })
        ));
        assert_eq!(engine.model.calls(), 1);
    }

    #[tokio::test]
    async fn test_identical_inputs_give_identical_payloads() {
        let engine = engine(StubModel::replying(
            r#"{"matches":[{"id":3,"reasoning":"old"},{"id":1,"reasoning":"sun"}],"message":"two"}"#,
        ));
        let first = serde_json::to_vec(&engine.search("trip").await.unwrap()).unwrap();
        let second = serde_json::to_vec(&engine.search("trip").await.unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
