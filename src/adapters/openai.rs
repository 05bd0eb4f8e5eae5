use crate::domain::model::Prompt;
use crate::domain::ports::{ModelClient, ProviderSettings};
use crate::utils::error::{Result, ScoutError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ChatCompletionsRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    r#type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat Completions client for OpenAI and compatible providers, locked to JSON
/// output mode.
pub struct OpenAiClient {
    settings: ProviderSettings,
    client: Client,
}

impl OpenAiClient {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            settings,
            client: Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    async fn complete(&self, prompt: &Prompt) -> Result<String> {
        let request = ChatCompletionsRequest {
            model: &self.settings.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_output_tokens,
            response_format: ResponseFormat {
                r#type: "json_object",
            },
        };

        tracing::debug!(
            "Calling {} with model {}",
            self.endpoint(),
            self.settings.model
        );
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ScoutError::upstream(e.status().map(|s| s.as_u16()), e.to_string()))?;

        let status = response.status();
        tracing::debug!("Provider response status: {}", status);

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ScoutError::UpstreamAuth {
                    status: status.as_u16(),
                    message: error_text,
                },
                _ => ScoutError::upstream(Some(status.as_u16()), error_text),
            });
        }

        let completion: ChatCompletionsResponse = response.json().await.map_err(|e| {
            ScoutError::upstream(None, format!("Failed to decode provider response: {}", e))
        })?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| ScoutError::upstream(None, "No response from AI"))
    }
}
