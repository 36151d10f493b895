//! Query executor
//!
//! Drives one request through the pipeline: prompt build, model call,
//! response validation, concurrent fan-out across sub-queries and
//! indexes, and the single fan-in aggregation. The worker holds only a
//! shared reference to the immutable spec, so one worker (or many) can
//! serve concurrent requests without locking.

use crate::aggregator::RawExecutionResult;
use crate::engine::{DynSearchEngine, ParsedArguments, ResultHandle};
use crate::error::{QueryGridError, Result};
use crate::model::{ChatMessage, ResponseFormat};
use crate::spec::{Spec, SubQuery};
use futures::future;
use serde_json::Value;
use std::any::TypeId;
use std::marker::PhantomData;
use std::sync::Arc;

/// One sub-query with every index's arguments already parsed and
/// validated, ready to fan out.
struct PlannedSubQuery {
    sub_query: SubQuery,
    searches: Vec<(String, Arc<dyn DynSearchEngine>, ParsedArguments)>,
}

/// Executes free-text queries against an assembled [`Spec`].
pub struct Worker {
    spec: Arc<Spec>,
}

impl Worker {
    pub fn new(spec: Spec) -> Self {
        Self {
            spec: Arc::new(spec),
        }
    }

    pub fn from_shared(spec: Arc<Spec>) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &Spec {
        &self.spec
    }

    fn build_messages(&self, query: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(&self.spec.prompt_message),
            ChatMessage::user(query),
        ]
    }

    /// Ask the model to decompose the query, returning the validated
    /// sub-queries without executing them.
    pub async fn build_query(&self, query: &str) -> Result<Vec<SubQuery>> {
        let plan = self.plan(query).await?;
        Ok(plan.into_iter().map(|planned| planned.sub_query).collect())
    }

    async fn plan(&self, query: &str) -> Result<Vec<PlannedSubQuery>> {
        let format = ResponseFormat::new("multi_query", self.spec.query_schema.clone());
        let response = self
            .spec
            .model_client
            .response(&self.build_messages(query), &format)
            .await?;
        self.parse_response(&response)
    }

    /// Validate the model's structured response and parse the full
    /// execution plan. Every argument payload is deserialized and
    /// validated here, before any search engine runs.
    fn parse_response(&self, response: &Value) -> Result<Vec<PlannedSubQuery>> {
        let queries = response
            .get("queries")
            .ok_or_else(|| {
                QueryGridError::Schema("'queries' key not found in model response".to_string())
            })?
            .as_array()
            .ok_or_else(|| {
                QueryGridError::Schema("'queries' in model response must be a list".to_string())
            })?;

        let mut plan = Vec::with_capacity(queries.len());
        for entry in queries {
            let sub_query: SubQuery = serde_json::from_value(entry.clone()).map_err(|e| {
                QueryGridError::Validation(format!("model produced an invalid sub-query: {e}"))
            })?;

            let mut searches = Vec::with_capacity(self.spec.units.len());
            for unit in &self.spec.units {
                let payload = sub_query.fields.get(&unit.name).ok_or_else(|| {
                    QueryGridError::Validation(format!(
                        "sub-query '{}' is missing arguments for index '{}'",
                        sub_query.sub_query, unit.name
                    ))
                })?;
                let arguments = unit.search_engine.parse_arguments(payload).map_err(|e| {
                    QueryGridError::Validation(format!("index '{}': {e}", unit.name))
                })?;
                searches.push((unit.name.clone(), unit.search_engine.clone(), arguments));
            }

            plan.push(PlannedSubQuery {
                sub_query,
                searches,
            });
        }
        Ok(plan)
    }

    /// Execute one free-text query end to end.
    ///
    /// Sub-queries and the per-index searches within them run
    /// concurrently with no ordering guarantee; the aggregator is invoked
    /// exactly once, after every search completed. A failed search does
    /// not cancel its siblings: all outstanding searches are awaited and
    /// the first error surfaces afterwards, unmodified.
    pub async fn execute(&self, query: &str) -> Result<ResultHandle> {
        let plan = self.plan(query).await?;
        tracing::debug!(
            sub_queries = plan.len(),
            indexes = self.spec.units.len(),
            "fanning out searches"
        );

        let sub_query_futures = plan.into_iter().map(|planned| async move {
            let searches = planned
                .searches
                .into_iter()
                .map(|(name, engine, arguments)| async move {
                    let result = engine.search(arguments).await;
                    (name, result)
                });
            let outcomes = future::join_all(searches).await;

            let mut results = Vec::with_capacity(outcomes.len());
            let mut first_error = None;
            for (name, outcome) in outcomes {
                match outcome {
                    Ok(handle) => results.push((name, handle)),
                    Err(e) if first_error.is_none() => first_error = Some(e),
                    Err(_) => {}
                }
            }
            match first_error {
                Some(e) => Err(e),
                None => Ok(RawExecutionResult {
                    sub_query: planned.sub_query,
                    results,
                }),
            }
        });

        let outcomes = future::join_all(sub_query_futures).await;
        let mut grid = Vec::with_capacity(outcomes.len());
        let mut first_error = None;
        for outcome in outcomes {
            match outcome {
                Ok(result) => grid.push(result),
                Err(e) if first_error.is_none() => first_error = Some(e),
                Err(_) => {}
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }

        tracing::debug!(sub_queries = grid.len(), "aggregating results");
        self.spec.aggregator.aggregate(grid).await
    }
}

/// A [`Worker`] whose final output type is fixed at construction.
///
/// Construction fails unless the aggregator's declared output type equals
/// `O` exactly, so a successful `execute` can return the concrete type.
pub struct TypedWorker<O> {
    worker: Worker,
    _marker: PhantomData<fn() -> O>,
}

impl<O> std::fmt::Debug for TypedWorker<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedWorker").finish_non_exhaustive()
    }
}

impl<O: Send + Sync + 'static> TypedWorker<O> {
    pub fn new(spec: Spec) -> Result<Self> {
        Self::from_shared(Arc::new(spec))
    }

    pub fn from_shared(spec: Arc<Spec>) -> Result<Self> {
        if spec.aggregator.output_type() != TypeId::of::<O>() {
            return Err(QueryGridError::TypeMismatch(format!(
                "pipeline expects output type '{}' but the aggregator produces '{}'",
                std::any::type_name::<O>(),
                spec.aggregator.output_type_name()
            )));
        }
        Ok(Self {
            worker: Worker::from_shared(spec),
            _marker: PhantomData,
        })
    }

    pub fn worker(&self) -> &Worker {
        &self.worker
    }

    pub async fn execute(&self, query: &str) -> Result<O> {
        self.worker.execute(query).await?.downcast::<O>()
    }
}
