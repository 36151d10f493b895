//! Canned-response model client for tests and offline runs

use super::{ChatMessage, ModelClient, ModelClientBuilder, ResponseFormat};
use crate::error::{QueryGridError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

/// Model client that returns a fixed JSON value from its config.
///
/// Declared as `{type: stub_ai, response: {...}}`; the `response` value is
/// returned verbatim for every request. The canned value is still run
/// through the executor's schema validation, so this client exercises the
/// full pipeline without a network dependency.
#[derive(Debug, Clone, Deserialize)]
pub struct StubModelClient {
    pub response: Value,
}

impl StubModelClient {
    pub fn new(response: Value) -> Self {
        Self { response }
    }
}

impl ModelClientBuilder for StubModelClient {
    fn from_config(config: &Value) -> Result<Self> {
        serde_json::from_value(config.clone())
            .map_err(|e| QueryGridError::Schema(format!("stub model client config: {e}")))
    }
}

#[async_trait]
impl ModelClient for StubModelClient {
    async fn response(&self, _messages: &[ChatMessage], _format: &ResponseFormat) -> Result<Value> {
        Ok(self.response.clone())
    }
}
