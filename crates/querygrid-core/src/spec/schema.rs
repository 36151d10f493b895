//! Composite query schema synthesis
//!
//! The query schema is built at assembly time from the registered units:
//! one required field per index (typed by that index's search engine
//! argument schema) plus the free-text `sub_query` field, wrapped in a
//! `queries` array so one request can carry multiple independent
//! sub-queries. It doubles as the structured-output instruction for the
//! model and the validation contract for its response.

use super::SpecUnit;
use serde_json::{json, Value};

/// Synthesize the composite query schema for a set of units.
pub fn compose_query_schema(units: &[SpecUnit]) -> Value {
    let mut properties = serde_json::Map::new();
    properties.insert(
        "sub_query".to_string(),
        json!({
            "type": "string",
            "description": "A restatement of the part of the user's intent this query covers.",
        }),
    );
    let mut required = vec![json!("sub_query")];

    for unit in units {
        properties.insert(unit.name.clone(), unit.search_engine.arguments_schema());
        required.push(json!(unit.name));
    }

    let single_query = json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    });

    json!({
        "type": "object",
        "properties": {
            "queries": {
                "type": "array",
                "items": single_query,
            },
        },
        "required": ["queries"],
        "additionalProperties": false,
    })
}
