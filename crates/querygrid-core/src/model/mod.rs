//! Model client contracts
//!
//! A model client turns a message list plus a structured-output schema into
//! a schema-conformant JSON response. Retry and timeout policy live inside
//! the client implementations, never in the executor.

mod openai;
mod stub;

pub use openai::OpenAiClient;
pub use stub::StubModelClient;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Chat message for completion requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Structured-output target the model must conform to.
#[derive(Debug, Clone)]
pub struct ResponseFormat {
    /// Schema name reported to the inference service.
    pub name: String,
    /// JSON schema for the expected response object.
    pub schema: Value,
}

impl ResponseFormat {
    pub fn new(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

/// Trait for model service clients
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Request a structured response conforming to `format`.
    ///
    /// Returns the raw parsed JSON value; schema validation against the
    /// assembled query schema happens in the executor.
    async fn response(&self, messages: &[ChatMessage], format: &ResponseFormat) -> Result<Value>;
}

/// Model clients that can be constructed from a declared config mapping,
/// which makes them registrable in a [`crate::registry::Registry`].
pub trait ModelClientBuilder: ModelClient + Sized + 'static {
    fn from_config(config: &Value) -> Result<Self>;
}
