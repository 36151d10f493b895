//! Type registry for pluggable components
//!
//! Maps string keys from the declarative spec to concrete implementations
//! of the four component roles. The typed `register_*` methods capture
//! each implementation's type metadata (result/input/output `TypeId`s) at
//! registration time, which is what the assembly-time compatibility check
//! runs against. A registry is an explicit owned object, never a process
//! singleton, so independent specs can coexist in one process.

use crate::aggregator::{Aggregator, DynAggregator, ErasedAggregator};
use crate::engine::{DynSearchEngine, ErasedSearchEngine, SearchEngine};
use crate::error::{QueryGridError, Result};
use crate::index::Index;
use crate::model::{ModelClient, ModelClientBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

type IndexFactory = Arc<dyn Fn(&Value) -> Result<Box<dyn Index>> + Send + Sync>;
type SearchEngineFactory = Arc<dyn Fn(&Value) -> Result<Arc<dyn DynSearchEngine>> + Send + Sync>;
type AggregatorFactory = Arc<dyn Fn(&Value) -> Result<Arc<dyn DynAggregator>> + Send + Sync>;
type ModelClientFactory = Arc<dyn Fn(&Value) -> Result<Arc<dyn ModelClient>> + Send + Sync>;

/// Registered search engine type with its declared result type metadata.
#[derive(Clone)]
pub struct SearchEngineEntry {
    factory: SearchEngineFactory,
    pub result_type: TypeId,
    pub result_type_name: &'static str,
}

impl std::fmt::Debug for SearchEngineEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngineEntry")
            .field("result_type", &self.result_type)
            .field("result_type_name", &self.result_type_name)
            .finish_non_exhaustive()
    }
}

impl SearchEngineEntry {
    pub fn construct(&self, config: &Value) -> Result<Arc<dyn DynSearchEngine>> {
        (self.factory)(config)
    }
}

/// Registry of pluggable component types for one deployment context.
#[derive(Default, Clone)]
pub struct Registry {
    index_types: HashMap<String, IndexFactory>,
    search_engine_types: HashMap<String, SearchEngineEntry>,
    aggregator_types: HashMap<String, AggregatorFactory>,
    model_client_types: HashMap<String, ModelClientFactory>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field(
                "index_types",
                &self.index_types.keys().collect::<Vec<_>>(),
            )
            .field("search_engine_types", &self.search_engine_types)
            .field(
                "aggregator_types",
                &self.aggregator_types.keys().collect::<Vec<_>>(),
            )
            .field(
                "model_client_types",
                &self.model_client_types.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_name(role: &'static str, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(QueryGridError::Conformance(format!(
                "{role} registration requires a non-empty name"
            )));
        }
        Ok(())
    }

    /// Register an index schema type under a declaration key.
    pub fn register_index<I>(&mut self, name: &str) -> Result<()>
    where
        I: Index + DeserializeOwned + 'static,
    {
        Self::check_name("index", name)?;
        if self.index_types.contains_key(name) {
            return Err(QueryGridError::DuplicateRegistration {
                role: "index",
                name: name.to_string(),
            });
        }
        let factory: IndexFactory = Arc::new(|definition: &Value| {
            let index: I = serde_json::from_value(definition.clone()).map_err(|e| {
                QueryGridError::Schema(format!(
                    "failed to construct index '{}': {e}",
                    type_name::<I>()
                ))
            })?;
            Ok(Box::new(index) as Box<dyn Index>)
        });
        self.index_types.insert(name.to_string(), factory);
        Ok(())
    }

    /// Register a search engine type under a declaration key.
    pub fn register_search_engine<E>(&mut self, name: &str) -> Result<()>
    where
        E: SearchEngine,
    {
        Self::check_name("search engine", name)?;
        if self.search_engine_types.contains_key(name) {
            return Err(QueryGridError::DuplicateRegistration {
                role: "search engine",
                name: name.to_string(),
            });
        }
        let factory: SearchEngineFactory = Arc::new(|config: &Value| {
            let engine = E::from_config(config)?;
            Ok(Arc::new(ErasedSearchEngine::new(engine)) as Arc<dyn DynSearchEngine>)
        });
        self.search_engine_types.insert(
            name.to_string(),
            SearchEngineEntry {
                factory,
                result_type: TypeId::of::<E::Result>(),
                result_type_name: type_name::<E::Result>(),
            },
        );
        Ok(())
    }

    /// Register an aggregator type under a declaration key.
    pub fn register_aggregator<A>(&mut self, name: &str) -> Result<()>
    where
        A: Aggregator,
    {
        Self::check_name("aggregator", name)?;
        if self.aggregator_types.contains_key(name) {
            return Err(QueryGridError::DuplicateRegistration {
                role: "aggregator",
                name: name.to_string(),
            });
        }
        let factory: AggregatorFactory = Arc::new(|config: &Value| {
            let aggregator = A::from_config(config)?;
            Ok(Arc::new(ErasedAggregator::new(aggregator)) as Arc<dyn DynAggregator>)
        });
        self.aggregator_types.insert(name.to_string(), factory);
        Ok(())
    }

    /// Register a model client type under a declaration key.
    pub fn register_model_client<C>(&mut self, name: &str) -> Result<()>
    where
        C: ModelClientBuilder,
    {
        Self::check_name("model client", name)?;
        if self.model_client_types.contains_key(name) {
            return Err(QueryGridError::DuplicateRegistration {
                role: "model client",
                name: name.to_string(),
            });
        }
        let factory: ModelClientFactory = Arc::new(|config: &Value| {
            let client = C::from_config(config)?;
            Ok(Arc::new(client) as Arc<dyn ModelClient>)
        });
        self.model_client_types.insert(name.to_string(), factory);
        Ok(())
    }

    pub fn resolve_index(&self, name: &str) -> Result<&IndexFactory> {
        self.index_types
            .get(name)
            .ok_or_else(|| QueryGridError::UnknownType {
                role: "index",
                name: name.to_string(),
            })
    }

    pub fn resolve_search_engine(&self, name: &str) -> Result<&SearchEngineEntry> {
        self.search_engine_types
            .get(name)
            .ok_or_else(|| QueryGridError::UnknownType {
                role: "search engine",
                name: name.to_string(),
            })
    }

    pub fn resolve_aggregator(&self, name: &str) -> Result<&AggregatorFactory> {
        self.aggregator_types
            .get(name)
            .ok_or_else(|| QueryGridError::UnknownType {
                role: "aggregator",
                name: name.to_string(),
            })
    }

    pub fn resolve_model_client(&self, name: &str) -> Result<&ModelClientFactory> {
        self.model_client_types
            .get(name)
            .ok_or_else(|| QueryGridError::UnknownType {
                role: "model client",
                name: name.to_string(),
            })
    }

    /// Union two independently built registries.
    ///
    /// Fails with [`QueryGridError::Overlap`] if any key collides within a
    /// role; neither input is partially consumed on failure visible to the
    /// caller since the merge is all-or-nothing.
    pub fn merge(mut self, other: Registry) -> Result<Registry> {
        fn check_overlap<V>(
            role: &str,
            left: &HashMap<String, V>,
            right: &HashMap<String, V>,
        ) -> Result<()> {
            for key in right.keys() {
                if left.contains_key(key) {
                    return Err(QueryGridError::Overlap(format!(
                        "{role} type '{key}' is registered on both sides"
                    )));
                }
            }
            Ok(())
        }

        check_overlap("index", &self.index_types, &other.index_types)?;
        check_overlap(
            "search engine",
            &self.search_engine_types,
            &other.search_engine_types,
        )?;
        check_overlap("aggregator", &self.aggregator_types, &other.aggregator_types)?;
        check_overlap(
            "model client",
            &self.model_client_types,
            &other.model_client_types,
        )?;

        self.index_types.extend(other.index_types);
        self.search_engine_types.extend(other.search_engine_types);
        self.aggregator_types.extend(other.aggregator_types);
        self.model_client_types.extend(other.model_client_types);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::ExecutionResult;
    use crate::engine::SearchArguments;
    use crate::index::TextIndex;
    use async_trait::async_trait;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct NoArguments {}

    impl SearchArguments for NoArguments {
        fn schema() -> Value {
            json!({"type": "object", "properties": {}})
        }
    }

    struct NullEngine;

    #[async_trait]
    impl SearchEngine for NullEngine {
        type Arguments = NoArguments;
        type Result = Vec<String>;

        fn from_config(_config: &Value) -> Result<Self> {
            Ok(Self)
        }

        async fn search(&self, _arguments: NoArguments) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    struct NullAggregator;

    #[async_trait]
    impl Aggregator for NullAggregator {
        type Input = Vec<String>;
        type Output = usize;

        fn from_config(_config: &Value) -> Result<Self> {
            Ok(Self)
        }

        async fn aggregate(&self, tasks: Vec<ExecutionResult<Vec<String>>>) -> Result<usize> {
            Ok(tasks.len())
        }
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = Registry::new();
        registry.register_index::<TextIndex>("text_index").unwrap();
        let err = registry.register_index::<TextIndex>("text_index").unwrap_err();
        assert!(matches!(
            err,
            QueryGridError::DuplicateRegistration { role: "index", .. }
        ));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut registry = Registry::new();
        let err = registry.register_index::<TextIndex>("").unwrap_err();
        assert!(matches!(err, QueryGridError::Conformance(_)));
    }

    #[test]
    fn test_resolve_unknown_type() {
        let registry = Registry::new();
        let err = registry.resolve_search_engine("missing").unwrap_err();
        assert!(matches!(
            err,
            QueryGridError::UnknownType {
                role: "search engine",
                ..
            }
        ));
    }

    #[test]
    fn test_engine_entry_captures_result_type() {
        let mut registry = Registry::new();
        registry
            .register_search_engine::<NullEngine>("null_search")
            .unwrap();
        let entry = registry.resolve_search_engine("null_search").unwrap();
        assert_eq!(entry.result_type, TypeId::of::<Vec<String>>());
    }

    #[test]
    fn test_merge_disjoint_registries() {
        let mut left = Registry::new();
        left.register_index::<TextIndex>("text_index").unwrap();
        let mut right = Registry::new();
        right
            .register_aggregator::<NullAggregator>("null_aggregator")
            .unwrap();

        let merged = left.merge(right).unwrap();
        assert!(merged.resolve_index("text_index").is_ok());
        assert!(merged.resolve_aggregator("null_aggregator").is_ok());
    }

    #[test]
    fn test_merge_overlap_names_key() {
        let mut left = Registry::new();
        left.register_index::<TextIndex>("text_index").unwrap();
        let mut right = Registry::new();
        right.register_index::<TextIndex>("text_index").unwrap();

        let err = left.merge(right).unwrap_err();
        assert!(err.to_string().contains("text_index"));
    }
}
