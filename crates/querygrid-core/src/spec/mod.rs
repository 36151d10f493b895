//! Assembled spec: the immutable contract for one deployment
//!
//! A [`Spec`] combines the declared indexes, their search engines, one
//! aggregator, and one model client, together with the two derived
//! artifacts: the rendered system prompt and the composite query schema
//! the model must produce. Specs are immutable after assembly and safe to
//! share across concurrent requests.

mod builder;
mod prompt;
mod schema;
mod validator;

pub use builder::SpecBuilder;
pub use prompt::{CONTEXT_PLACEHOLDER, SYSTEM_PROMPT_TEMPLATE};
pub use schema::compose_query_schema;
pub use validator::{validate_compatibility, validate_declaration};

use crate::aggregator::DynAggregator;
use crate::engine::DynSearchEngine;
use crate::index::Index;
use crate::model::ModelClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// One structured query produced by the model from the user's free text.
///
/// `fields` holds one argument payload per index name; multiple sub-queries
/// from one request combine with OR semantics, fields within one sub-query
/// with AND. That contract is communicated to the model via the prompt and
/// enforced here only as far as type validation goes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubQuery {
    /// Free-text restatement of the intent this sub-query covers.
    pub sub_query: String,

    /// Per-index argument payloads, keyed by index name.
    #[serde(flatten)]
    pub fields: serde_json::Map<String, Value>,
}

/// One index paired with its search engine inside an assembled spec.
pub struct SpecUnit {
    pub name: String,
    pub index: Box<dyn Index>,
    pub search_engine: Arc<dyn DynSearchEngine>,
}

impl SpecUnit {
    /// Context block this unit contributes to the system prompt.
    pub fn prompt(&self) -> String {
        format!("Index Name: {}\n{}\n", self.name, self.index.prompt())
    }
}

/// The fully assembled, immutable contract for one deployment.
///
/// Invariants upheld by [`SpecBuilder::build`]: `units` is non-empty,
/// every unit name appears as a required field of the per-sub-query
/// schema, and the aggregator's input type equals every engine's result
/// type.
pub struct Spec {
    /// Index units in declaration order.
    pub units: Vec<SpecUnit>,
    pub aggregator: Arc<dyn DynAggregator>,
    pub model_client: Arc<dyn ModelClient>,
    /// Fully rendered system prompt.
    pub prompt_message: String,
    /// Composite JSON schema for the model's structured response.
    pub query_schema: Value,
}

impl std::fmt::Debug for Spec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spec")
            .field(
                "units",
                &self.units.iter().map(|u| &u.name).collect::<Vec<_>>(),
            )
            .field("prompt_message", &self.prompt_message)
            .field("query_schema", &self.query_schema)
            .finish_non_exhaustive()
    }
}

impl Spec {
    /// Look up a unit by index name.
    pub fn unit(&self, name: &str) -> Option<&SpecUnit> {
        self.units.iter().find(|unit| unit.name == name)
    }
}
