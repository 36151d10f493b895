//! Configuration management

use serde::{Deserialize, Serialize};

/// Model service configuration for external inference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelServiceConfig {
    /// Base URL of the inference service for chat/completions
    #[serde(default = "default_url")]
    pub url: String,

    /// Model name for chat completions
    #[serde(default = "default_model")]
    pub model: String,

    /// API key (optional, for authenticated services)
    #[serde(default = "default_api_key")]
    pub api_key: Option<String>,

    /// Sampling temperature for completions
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ModelServiceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            model: default_model(),
            api_key: default_api_key(),
            temperature: default_temperature(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_url() -> String {
    std::env::var("QUERYGRID_LLM_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

fn default_model() -> String {
    std::env::var("QUERYGRID_LLM_MODEL").unwrap_or_else(|_| "gpt-4o".to_string())
}

fn default_api_key() -> Option<String> {
    std::env::var("QUERYGRID_LLM_API_KEY").ok()
}

fn default_temperature() -> f32 {
    0.0
}

fn default_timeout() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_field_defaults() {
        let config: ModelServiceConfig =
            serde_json::from_value(serde_json::json!({ "url": "http://inference:9000" })).unwrap();
        assert_eq!(config.url, "http://inference:9000");
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_config_ignores_unknown_fields() {
        let config: ModelServiceConfig = serde_json::from_value(serde_json::json!({
            "type": "openai",
            "url": "http://inference:9000",
            "model": "gpt-4o-mini"
        }))
        .unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
    }
}
