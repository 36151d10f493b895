//! Boolean selection engine over a CSV column

use crate::table::{load_column, RowSet, TableEngineConfig};
use async_trait::async_trait;
use querygrid_core::{QueryGridError, Result, SearchArguments, SearchEngine};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BoolArguments {
    pub select_true: bool,
    pub select_false: bool,
}

impl SearchArguments for BoolArguments {
    fn validate(&self) -> std::result::Result<(), String> {
        if !self.select_true && !self.select_false {
            return Err("Both select_true and select_false cannot be false.".to_string());
        }
        Ok(())
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "select_true": {
                    "type": "boolean",
                    "description": "Include rows whose value is true.",
                },
                "select_false": {
                    "type": "boolean",
                    "description": "Include rows whose value is false.",
                },
            },
            "required": ["select_true", "select_false"],
            "additionalProperties": false,
        })
    }
}

/// Selects rows by truth value. Selecting both sides matches every row;
/// selecting neither is rejected by argument validation.
#[derive(Debug, Clone, Deserialize)]
pub struct BoolSearchEngine {
    #[serde(flatten)]
    pub config: TableEngineConfig,
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[async_trait]
impl SearchEngine for BoolSearchEngine {
    type Arguments = BoolArguments;
    type Result = RowSet;

    fn from_config(config: &Value) -> Result<Self> {
        serde_json::from_value(config.clone())
            .map_err(|e| QueryGridError::Schema(format!("bool search engine config: {e}")))
    }

    async fn search(&self, arguments: BoolArguments) -> Result<RowSet> {
        let column = load_column(&self.config)?;
        let mut rows = RowSet::new();
        for (row, raw) in column.iter().enumerate() {
            let value = parse_bool(raw).ok_or_else(|| {
                QueryGridError::Engine(format!(
                    "column '{}' row {row}: '{raw}' is not a boolean",
                    self.config.column_name
                ))
            })?;
            if (value && arguments.select_true) || (!value && arguments.select_false) {
                rows.insert(row);
            }
        }
        Ok(rows)
    }
}
