//! Aggregator contracts
//!
//! An aggregator reduces the per-sub-query, per-index result grid from one
//! request into a single final answer. Like search engines, aggregators are
//! written against a typed trait and erased into an object-safe form for
//! the assembled spec.

use crate::engine::ResultHandle;
use crate::error::{QueryGridError, Result};
use crate::spec::SubQuery;
use async_trait::async_trait;
use serde_json::Value;
use std::any::{type_name, TypeId};

/// One sub-query's completed result map, typed by the shared result type.
///
/// `results` preserves index declaration order.
#[derive(Debug)]
pub struct ExecutionResult<R> {
    pub sub_query: SubQuery,
    pub results: Vec<(String, R)>,
}

impl<R> ExecutionResult<R> {
    /// Look up one index's result by name.
    pub fn result(&self, name: &str) -> Option<&R> {
        self.results
            .iter()
            .find(|(index_name, _)| index_name == name)
            .map(|(_, result)| result)
    }
}

/// Reduces the full result grid of one request to a single answer.
#[async_trait]
pub trait Aggregator: Sized + Send + Sync + 'static {
    /// Element type of each per-index result; must match every engine's
    /// [`crate::engine::SearchEngine::Result`] in the assembled spec.
    type Input: Send + Sync + 'static;

    /// Final answer type returned to the caller.
    type Output: Send + Sync + 'static;

    /// Construct the aggregator from its declared config mapping.
    fn from_config(config: &Value) -> Result<Self>;

    /// Reduce all per-sub-query result maps to the final answer.
    ///
    /// Invoked exactly once per request, after every search completed.
    /// An empty `tasks` list means the model produced no sub-queries and
    /// must yield this aggregator's "no matches" value, not an error.
    async fn aggregate(&self, tasks: Vec<ExecutionResult<Self::Input>>) -> Result<Self::Output>;
}

/// One sub-query's result map in type-erased form.
#[derive(Debug)]
pub struct RawExecutionResult {
    pub sub_query: SubQuery,
    pub results: Vec<(String, ResultHandle)>,
}

/// Object-safe form of [`Aggregator`] used by the spec and executor.
#[async_trait]
pub trait DynAggregator: Send + Sync {
    fn input_type(&self) -> TypeId;

    fn input_type_name(&self) -> &'static str;

    fn output_type(&self) -> TypeId;

    fn output_type_name(&self) -> &'static str;

    async fn aggregate(&self, tasks: Vec<RawExecutionResult>) -> Result<ResultHandle>;
}

/// Adapter erasing a typed [`Aggregator`] into a [`DynAggregator`].
pub(crate) struct ErasedAggregator<A: Aggregator> {
    inner: A,
}

impl<A: Aggregator> ErasedAggregator<A> {
    pub(crate) fn new(inner: A) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<A: Aggregator> DynAggregator for ErasedAggregator<A> {
    fn input_type(&self) -> TypeId {
        TypeId::of::<A::Input>()
    }

    fn input_type_name(&self) -> &'static str {
        type_name::<A::Input>()
    }

    fn output_type(&self) -> TypeId {
        TypeId::of::<A::Output>()
    }

    fn output_type_name(&self) -> &'static str {
        type_name::<A::Output>()
    }

    async fn aggregate(&self, tasks: Vec<RawExecutionResult>) -> Result<ResultHandle> {
        let mut typed_tasks = Vec::with_capacity(tasks.len());
        for task in tasks {
            let mut results = Vec::with_capacity(task.results.len());
            for (name, handle) in task.results {
                let result = handle.downcast::<A::Input>().map_err(|_| {
                    QueryGridError::TypeMismatch(format!(
                        "aggregator '{}' expects input type '{}' but index '{}' produced a \
                         different result type",
                        type_name::<A>(),
                        type_name::<A::Input>(),
                        name
                    ))
                })?;
                results.push((name, result));
            }
            typed_tasks.push(ExecutionResult {
                sub_query: task.sub_query,
                results,
            });
        }
        let output = self.inner.aggregate(typed_tasks).await?;
        Ok(ResultHandle::new(output))
    }
}
