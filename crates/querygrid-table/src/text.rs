//! Text search engine over a CSV column

use crate::table::{load_column, RowSet, TableEngineConfig};
use async_trait::async_trait;
use querygrid_core::{Result, SearchArguments, SearchEngine};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingStrategy {
    Exact,
    Contains,
    StartsWith,
    EndsWith,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextArguments {
    pub keywords: Vec<String>,
}

impl SearchArguments for TextArguments {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "keywords": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "List of keywords for the search engine.",
                }
            },
            "required": ["keywords"],
            "additionalProperties": false,
        })
    }
}

/// Case-insensitive keyword matcher; a row matches when any keyword
/// matches under the configured strategy.
#[derive(Debug, Clone, Deserialize)]
pub struct TextSearchEngine {
    #[serde(flatten)]
    pub config: TableEngineConfig,
    pub matching_strategy: MatchingStrategy,
}

#[async_trait]
impl SearchEngine for TextSearchEngine {
    type Arguments = TextArguments;
    type Result = RowSet;

    fn from_config(config: &Value) -> Result<Self> {
        serde_json::from_value(config.clone()).map_err(|e| {
            querygrid_core::QueryGridError::Schema(format!("text search engine config: {e}"))
        })
    }

    async fn search(&self, arguments: TextArguments) -> Result<RowSet> {
        let column = load_column(&self.config)?;
        let keywords: Vec<String> = arguments
            .keywords
            .iter()
            .map(|keyword| keyword.to_lowercase())
            .collect();

        let rows = column
            .iter()
            .enumerate()
            .filter(|(_, value)| {
                let value = value.to_lowercase();
                keywords.iter().any(|keyword| match self.matching_strategy {
                    MatchingStrategy::Exact => value == *keyword,
                    MatchingStrategy::Contains => value.contains(keyword),
                    MatchingStrategy::StartsWith => value.starts_with(keyword),
                    MatchingStrategy::EndsWith => value.ends_with(keyword),
                })
            })
            .map(|(row, _)| row)
            .collect();
        Ok(rows)
    }
}
