//! HTTP client for OpenAI-compatible inference services (vLLM, OpenAI, etc.)

use super::{ChatMessage, ModelClient, ModelClientBuilder, ResponseFormat};
use crate::config::ModelServiceConfig;
use crate::error::{QueryGridError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// OpenAI-compatible structured-output client.
///
/// Sends the assembled query schema as a strict `json_schema` response
/// format so the service constrains decoding to the expected shape. No
/// retry is performed here; callers that want one should wrap the client.
pub struct OpenAiClient {
    http_client: reqwest::Client,
    config: ModelServiceConfig,
}

impl OpenAiClient {
    /// Create a new client from configuration
    pub fn new(config: ModelServiceConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(QueryGridError::Http)?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ModelServiceConfig::default())
    }

    pub fn model_name(&self) -> &str {
        &self.config.model
    }
}

impl ModelClientBuilder for OpenAiClient {
    fn from_config(config: &Value) -> Result<Self> {
        let config: ModelServiceConfig = serde_json::from_value(config.clone())
            .map_err(|e| QueryGridError::Schema(format!("model client config: {e}")))?;
        Self::new(config)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    response_format: Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl ModelClient for OpenAiClient {
    async fn response(&self, messages: &[ChatMessage], format: &ResponseFormat) -> Result<Value> {
        let request = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            response_format: serde_json::json!({
                "type": "json_schema",
                "json_schema": {
                    "name": format.name,
                    "schema": format.schema,
                    "strict": true,
                },
            }),
        };

        let url = format!("{}/v1/chat/completions", self.config.url);
        tracing::debug!(model = %self.config.model, "requesting structured completion");

        let mut req = self.http_client.post(&url).json(&request);
        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = req.send().await.map_err(QueryGridError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(QueryGridError::ModelResponse(format!(
                "inference service error (HTTP {status}): {body}"
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| QueryGridError::ModelResponse(format!("malformed completion: {e}")))?;

        let content = chat_response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                QueryGridError::ModelResponse("empty response from model".to_string())
            })?;

        serde_json::from_str(content).map_err(|e| {
            QueryGridError::ModelResponse(format!("response content is not valid JSON: {e}"))
        })
    }
}
