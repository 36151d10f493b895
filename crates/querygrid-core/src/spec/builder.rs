//! Spec assembly
//!
//! A [`SpecBuilder`] owns a [`Registry`] plus partial assembly state and
//! turns a declarative spec into an immutable [`Spec`]. Assembly is
//! all-or-nothing: any resolution, construction, or compatibility failure
//! aborts the build and no partial spec ever escapes.

use super::prompt::{CONTEXT_PLACEHOLDER, SYSTEM_PROMPT_TEMPLATE};
use super::schema::compose_query_schema;
use super::validator::{validate_compatibility, validate_declaration};
use super::{Spec, SpecUnit};
use crate::aggregator::{Aggregator, DynAggregator};
use crate::engine::SearchEngine;
use crate::error::{QueryGridError, Result};
use crate::index::Index;
use crate::model::{ModelClient, ModelClientBuilder};
use crate::registry::Registry;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Incremental assembler for a [`Spec`].
pub struct SpecBuilder {
    registry: Registry,
    units: Vec<SpecUnit>,
    aggregator: Option<Arc<dyn DynAggregator>>,
    model_client: Option<Arc<dyn ModelClient>>,
    prompt_template: String,
}

impl std::fmt::Debug for SpecBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecBuilder")
            .field(
                "units",
                &self.units.iter().map(|u| &u.name).collect::<Vec<_>>(),
            )
            .field("prompt_template", &self.prompt_template)
            .finish_non_exhaustive()
    }
}

impl SpecBuilder {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            units: Vec::new(),
            aggregator: None,
            model_client: None,
            prompt_template: SYSTEM_PROMPT_TEMPLATE.to_string(),
        }
    }

    /// Create a builder with a custom prompt template.
    ///
    /// The template must contain the `{context}` placeholder where the
    /// per-index blocks are inserted.
    pub fn with_prompt_template(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if !template.contains(CONTEXT_PLACEHOLDER) {
            return Err(QueryGridError::Schema(format!(
                "prompt template must contain the '{CONTEXT_PLACEHOLDER}' placeholder"
            )));
        }
        let mut builder = Self::new();
        builder.prompt_template = template;
        Ok(builder)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Register an index schema type; see [`Registry::register_index`].
    pub fn register_index<I>(&mut self, name: &str) -> Result<()>
    where
        I: Index + DeserializeOwned + 'static,
    {
        self.registry.register_index::<I>(name)
    }

    pub fn register_search_engine<E>(&mut self, name: &str) -> Result<()>
    where
        E: SearchEngine,
    {
        self.registry.register_search_engine::<E>(name)
    }

    pub fn register_aggregator<A>(&mut self, name: &str) -> Result<()>
    where
        A: Aggregator,
    {
        self.registry.register_aggregator::<A>(name)
    }

    pub fn register_model_client<C>(&mut self, name: &str) -> Result<()>
    where
        C: ModelClientBuilder,
    {
        self.registry.register_model_client::<C>(name)
    }

    /// Ingest a full declarative spec (see the YAML contract in the crate
    /// docs): an `indexs` list plus one `aggregator` and one `ai_client`.
    pub fn include(&mut self, declaration: &Value) -> Result<()> {
        validate_declaration(declaration)?;

        let entries = declaration["indexs"].as_array().ok_or_else(|| {
            QueryGridError::Schema("'indexs' section must be a list".to_string())
        })?;
        for entry in entries {
            let name = required_str(entry, "name", "index entry")?;
            let index_type = required_str(entry, "type", &format!("index '{name}'"))?;
            let engine_spec = entry.get("search_engine").ok_or_else(|| {
                QueryGridError::Schema(format!("index '{name}' is missing 'search_engine'"))
            })?;
            let engine_type =
                required_str(engine_spec, "type", &format!("index '{name}' search_engine"))?;
            self.add_index_spec(&name, &index_type, entry, &engine_type, engine_spec)?;
        }

        let aggregator_spec = &declaration["aggregator"];
        let aggregator_type = required_str(aggregator_spec, "type", "aggregator")?;
        self.set_aggregator(&aggregator_type, aggregator_spec)?;

        let client_spec = &declaration["ai_client"];
        let client_type = required_str(client_spec, "type", "ai_client")?;
        self.set_model_client(&client_type, client_spec)?;

        Ok(())
    }

    /// Parse a YAML declaration string and ingest it.
    pub fn include_yaml(&mut self, text: &str) -> Result<()> {
        let declaration: Value = serde_yaml::from_str(text)?;
        self.include(&declaration)
    }

    /// Add one index/search-engine pair to the spec.
    pub fn add_index_spec(
        &mut self,
        name: &str,
        index_type: &str,
        index_definition: &Value,
        engine_type: &str,
        engine_config: &Value,
    ) -> Result<()> {
        if name.is_empty() {
            return Err(QueryGridError::Schema(
                "index name cannot be empty".to_string(),
            ));
        }
        if self.units.iter().any(|unit| unit.name == name) {
            return Err(QueryGridError::Schema(format!(
                "spec unit with name '{name}' already exists"
            )));
        }

        let index_factory = self.registry.resolve_index(index_type)?;
        let index = index_factory(index_definition)
            .map_err(|e| QueryGridError::Schema(format!("index '{name}': {e}")))?;

        let engine_entry = self.registry.resolve_search_engine(engine_type)?;
        let search_engine = engine_entry
            .construct(engine_config)
            .map_err(|e| QueryGridError::Schema(format!("index '{name}': {e}")))?;

        self.units.push(SpecUnit {
            name: name.to_string(),
            index,
            search_engine,
        });
        Ok(())
    }

    /// Resolve and construct the single aggregator for the spec.
    pub fn set_aggregator(&mut self, aggregator_type: &str, config: &Value) -> Result<()> {
        if self.aggregator.is_some() {
            return Err(QueryGridError::Schema(
                "aggregator is already configured".to_string(),
            ));
        }
        let factory = self.registry.resolve_aggregator(aggregator_type)?;
        let aggregator = factory(config)
            .map_err(|e| QueryGridError::Schema(format!("aggregator '{aggregator_type}': {e}")))?;
        self.aggregator = Some(aggregator);
        Ok(())
    }

    /// Resolve and construct the single model client for the spec.
    pub fn set_model_client(&mut self, client_type: &str, config: &Value) -> Result<()> {
        if self.model_client.is_some() {
            return Err(QueryGridError::Schema(
                "model client is already configured".to_string(),
            ));
        }
        let factory = self.registry.resolve_model_client(client_type)?;
        let client = factory(config)
            .map_err(|e| QueryGridError::Schema(format!("ai_client '{client_type}': {e}")))?;
        self.model_client = Some(client);
        Ok(())
    }

    /// Combine two builders: union of registries and added units.
    ///
    /// Associative and commutative up to unit ordering; fails with an
    /// overlap error on any colliding name, or when both sides already
    /// carry an aggregator or model client.
    pub fn merge(self, other: SpecBuilder) -> Result<SpecBuilder> {
        if self.aggregator.is_some() && other.aggregator.is_some() {
            return Err(QueryGridError::Overlap(
                "aggregator is configured on both builders".to_string(),
            ));
        }
        if self.model_client.is_some() && other.model_client.is_some() {
            return Err(QueryGridError::Overlap(
                "model client is configured on both builders".to_string(),
            ));
        }
        for unit in &other.units {
            if self.units.iter().any(|existing| existing.name == unit.name) {
                return Err(QueryGridError::Overlap(format!(
                    "spec unit '{}' exists on both builders",
                    unit.name
                )));
            }
        }

        let prompt_template = if self.prompt_template != SYSTEM_PROMPT_TEMPLATE {
            if other.prompt_template != SYSTEM_PROMPT_TEMPLATE
                && other.prompt_template != self.prompt_template
            {
                return Err(QueryGridError::Overlap(
                    "prompt template is customized on both builders".to_string(),
                ));
            }
            self.prompt_template
        } else {
            other.prompt_template
        };

        let registry = self.registry.merge(other.registry)?;
        let mut units = self.units;
        units.extend(other.units);

        Ok(SpecBuilder {
            registry,
            units,
            aggregator: self.aggregator.or(other.aggregator),
            model_client: self.model_client.or(other.model_client),
            prompt_template,
        })
    }

    /// Promote the builder into an immutable [`Spec`].
    pub fn build(self) -> Result<Spec> {
        if self.units.is_empty() {
            return Err(QueryGridError::Schema(
                "no index units available to build a spec".to_string(),
            ));
        }
        let aggregator = self.aggregator.ok_or_else(|| {
            QueryGridError::Schema("no aggregator available to build a spec".to_string())
        })?;
        let model_client = self.model_client.ok_or_else(|| {
            QueryGridError::Schema("no model client available to build a spec".to_string())
        })?;

        let context = self
            .units
            .iter()
            .map(SpecUnit::prompt)
            .collect::<Vec<_>>()
            .join("\n");
        let prompt_message = self.prompt_template.replace(CONTEXT_PLACEHOLDER, &context);
        let query_schema = compose_query_schema(&self.units);

        validate_compatibility(&self.units, aggregator.as_ref())?;

        tracing::info!(units = self.units.len(), "assembled spec");

        Ok(Spec {
            units: self.units,
            aggregator,
            model_client,
            prompt_message,
            query_schema,
        })
    }
}

impl Default for SpecBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn required_str(value: &Value, key: &str, context: &str) -> Result<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| QueryGridError::Schema(format!("{context} is missing '{key}'")))
}
