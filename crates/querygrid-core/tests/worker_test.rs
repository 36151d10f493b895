//! Integration tests for the query executor
//!
//! Uses a stubbed model client so the fan-out/fan-in machinery runs
//! without a network dependency.

use async_trait::async_trait;
use querygrid_core::{
    Aggregator, ExecutionResult, QueryGridError, Result, SearchArguments, SearchEngine,
    SpecBuilder, StubModelClient, TextIndex, TypedWorker, Worker,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
struct RangeArguments {
    start: Option<f64>,
    end: Option<f64>,
}

impl SearchArguments for RangeArguments {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "start": {"type": ["number", "null"]},
                "end": {"type": ["number", "null"]},
            },
            "required": ["start", "end"],
            "additionalProperties": false,
        })
    }

    fn validate(&self) -> std::result::Result<(), String> {
        match (self.start, self.end) {
            (None, None) => Err("start and end cannot both be null".to_string()),
            (Some(start), Some(end)) if start > end => {
                Err("start must be less than or equal to end".to_string())
            }
            _ => Ok(()),
        }
    }
}

/// Emits the matched bounds so tests can observe which arguments arrived.
struct RangeEngine;

#[async_trait]
impl SearchEngine for RangeEngine {
    type Arguments = RangeArguments;
    type Result = Vec<f64>;

    fn from_config(_config: &Value) -> Result<Self> {
        Ok(Self)
    }

    async fn search(&self, arguments: RangeArguments) -> Result<Vec<f64>> {
        Ok([arguments.start, arguments.end]
            .into_iter()
            .flatten()
            .collect())
    }
}

/// Always fails; used to check error propagation from the data layer.
struct FailingEngine;

#[async_trait]
impl SearchEngine for FailingEngine {
    type Arguments = RangeArguments;
    type Result = Vec<f64>;

    fn from_config(_config: &Value) -> Result<Self> {
        Ok(Self)
    }

    async fn search(&self, _arguments: RangeArguments) -> Result<Vec<f64>> {
        Err(QueryGridError::Engine("backend unavailable".to_string()))
    }
}

struct PassthroughAggregator;

#[async_trait]
impl Aggregator for PassthroughAggregator {
    type Input = Vec<f64>;
    type Output = Vec<ExecutionResult<Vec<f64>>>;

    fn from_config(_config: &Value) -> Result<Self> {
        Ok(Self)
    }

    async fn aggregate(
        &self,
        tasks: Vec<ExecutionResult<Vec<f64>>>,
    ) -> Result<Vec<ExecutionResult<Vec<f64>>>> {
        Ok(tasks)
    }
}

fn declaration(index_names: &[&str], engine_type: &str, response: Value) -> Value {
    let indexs: Vec<Value> = index_names
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "type": "text_index",
                "description": format!("Index over {name}."),
                "search_engine": {"type": engine_type}
            })
        })
        .collect();
    json!({
        "indexs": indexs,
        "aggregator": {"type": "passthrough"},
        "ai_client": {"type": "stub_ai", "response": response}
    })
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn build_worker(index_names: &[&str], engine_type: &str, response: Value) -> Worker {
    init_tracing();
    let mut builder = SpecBuilder::new();
    builder.register_index::<TextIndex>("text_index").unwrap();
    builder
        .register_search_engine::<RangeEngine>("range_search")
        .unwrap();
    builder
        .register_search_engine::<FailingEngine>("failing_search")
        .unwrap();
    builder
        .register_aggregator::<PassthroughAggregator>("passthrough")
        .unwrap();
    builder
        .register_model_client::<StubModelClient>("stub_ai")
        .unwrap();
    builder
        .include(&declaration(index_names, engine_type, response))
        .unwrap();
    Worker::new(builder.build().unwrap())
}

fn range(start: f64, end: f64) -> Value {
    json!({"start": start, "end": end})
}

#[tokio::test]
async fn test_fan_out_join_produces_full_grid() {
    // N = 3 sub-queries, M = 2 indexes: the aggregator must see exactly
    // one call with 3 result maps of 2 entries each.
    let response = json!({"queries": [
        {"sub_query": "first", "price_index": range(1.0, 2.0), "year_index": range(3.0, 4.0)},
        {"sub_query": "second", "price_index": range(5.0, 6.0), "year_index": range(7.0, 8.0)},
        {"sub_query": "third", "price_index": range(9.0, 10.0), "year_index": range(11.0, 12.0)},
    ]});
    let worker = build_worker(&["price_index", "year_index"], "range_search", response);

    let handle = worker.execute("anything").await.unwrap();
    let grid = handle
        .downcast::<Vec<ExecutionResult<Vec<f64>>>>()
        .unwrap();

    assert_eq!(grid.len(), 3);
    for task in &grid {
        assert_eq!(task.results.len(), 2);
        assert_eq!(task.results[0].0, "price_index");
        assert_eq!(task.results[1].0, "year_index");
    }
    assert_eq!(grid[0].sub_query.sub_query, "first");
    assert_eq!(grid[1].result("price_index").unwrap(), &vec![5.0, 6.0]);
    assert_eq!(grid[2].result("year_index").unwrap(), &vec![11.0, 12.0]);
}

#[tokio::test]
async fn test_empty_queries_list_reaches_aggregator() {
    let worker = build_worker(
        &["price_index"],
        "range_search",
        json!({"queries": []}),
    );
    let handle = worker.execute("no matches").await.unwrap();
    let grid = handle
        .downcast::<Vec<ExecutionResult<Vec<f64>>>>()
        .unwrap();
    assert!(grid.is_empty());
}

#[tokio::test]
async fn test_missing_queries_key_is_schema_error() {
    // The failing engine would error if reached; a schema error proves
    // validation rejected the response before any search ran.
    let worker = build_worker(
        &["price_index"],
        "failing_search",
        json!({"answers": []}),
    );
    let err = worker.execute("anything").await.unwrap_err();
    assert!(matches!(err, QueryGridError::Schema(_)));
    assert!(err.to_string().contains("queries"));
}

#[tokio::test]
async fn test_missing_index_field_is_validation_error() {
    let worker = build_worker(
        &["price_index", "year_index"],
        "failing_search",
        json!({"queries": [
            {"sub_query": "partial", "price_index": range(1.0, 2.0)}
        ]}),
    );
    let err = worker.execute("anything").await.unwrap_err();
    assert!(matches!(err, QueryGridError::Validation(_)));
    assert!(err.to_string().contains("year_index"));
}

#[tokio::test]
async fn test_inverted_range_fails_before_search() {
    let worker = build_worker(
        &["price_index"],
        "failing_search",
        json!({"queries": [
            {"sub_query": "bad range", "price_index": range(5.0, 2.0)}
        ]}),
    );
    let err = worker.execute("anything").await.unwrap_err();
    assert!(matches!(err, QueryGridError::Validation(_)));
    assert!(err.to_string().contains("less than or equal"));
}

#[tokio::test]
async fn test_engine_errors_propagate_unmodified() {
    let worker = build_worker(
        &["price_index"],
        "failing_search",
        json!({"queries": [
            {"sub_query": "doomed", "price_index": range(1.0, 2.0)}
        ]}),
    );
    let err = worker.execute("anything").await.unwrap_err();
    assert!(matches!(err, QueryGridError::Engine(_)));
    assert!(err.to_string().contains("backend unavailable"));
}

#[tokio::test]
async fn test_build_query_returns_sub_queries_without_executing() {
    let worker = build_worker(
        &["price_index"],
        "failing_search",
        json!({"queries": [
            {"sub_query": "cheap books", "price_index": range(0.0, 15.0)}
        ]}),
    );
    // failing_search would error on execute; build_query must not run it.
    let sub_queries = worker.build_query("cheap books").await.unwrap();
    assert_eq!(sub_queries.len(), 1);
    assert_eq!(sub_queries[0].sub_query, "cheap books");
    assert!(sub_queries[0].fields.contains_key("price_index"));
}

#[tokio::test]
async fn test_typed_worker_checks_output_type() {
    let mut builder = SpecBuilder::new();
    builder.register_index::<TextIndex>("text_index").unwrap();
    builder
        .register_search_engine::<RangeEngine>("range_search")
        .unwrap();
    builder
        .register_aggregator::<PassthroughAggregator>("passthrough")
        .unwrap();
    builder
        .register_model_client::<StubModelClient>("stub_ai")
        .unwrap();
    builder
        .include(&declaration(&["price_index"], "range_search", json!({"queries": []})))
        .unwrap();
    let spec = builder.build().unwrap();

    let err = TypedWorker::<String>::new(spec).unwrap_err();
    assert!(matches!(err, QueryGridError::TypeMismatch(_)));
}

#[tokio::test]
async fn test_typed_worker_returns_concrete_output() {
    let response = json!({"queries": [
        {"sub_query": "one", "price_index": range(1.0, 2.0)}
    ]});
    let mut builder = SpecBuilder::new();
    builder.register_index::<TextIndex>("text_index").unwrap();
    builder
        .register_search_engine::<RangeEngine>("range_search")
        .unwrap();
    builder
        .register_aggregator::<PassthroughAggregator>("passthrough")
        .unwrap();
    builder
        .register_model_client::<StubModelClient>("stub_ai")
        .unwrap();
    builder
        .include(&declaration(&["price_index"], "range_search", response))
        .unwrap();

    let worker =
        TypedWorker::<Vec<ExecutionResult<Vec<f64>>>>::new(builder.build().unwrap()).unwrap();
    let grid = worker.execute("anything").await.unwrap();
    assert_eq!(grid.len(), 1);
    assert_eq!(grid[0].result("price_index").unwrap(), &vec![1.0, 2.0]);
}
