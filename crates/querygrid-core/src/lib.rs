//! QueryGrid Core Library
//!
//! Framework for building natural-language search front-ends over
//! heterogeneous, statically declared data indexes.
//!
//! A deployment registers typed index schemas and paired search engines,
//! one aggregator, and one model client in a [`SpecBuilder`]. Building
//! the spec synthesizes a structured-output schema mirroring the
//! registered indexes; at run time a [`Worker`] sends that schema plus the
//! user's free text to the model, validates the returned sub-queries,
//! fans each one out across every index concurrently, and reduces the
//! result grid through the aggregator.
//!
//! # Declarative spec format
//!
//! ```yaml
//! indexs:
//!   - name: title_index
//!     type: text_index
//!     description: Book titles in the catalog.
//!     search_engine:
//!       type: text_search
//!       file_path: books.csv
//!       column_name: title
//!       matching_strategy: contains
//! aggregator:
//!   type: table_aggregator
//!   file_path: books.csv
//! ai_client:
//!   type: openai
//!   url: http://localhost:8000
//! ```

pub mod aggregator;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod model;
pub mod registry;
pub mod spec;
pub mod worker;

pub use aggregator::{Aggregator, DynAggregator, ExecutionResult, RawExecutionResult};
pub use config::ModelServiceConfig;
pub use engine::{DynSearchEngine, ParsedArguments, ResultHandle, SearchArguments, SearchEngine};
pub use error::{Error, QueryGridError, Result};
pub use index::{BoolIndex, DateIndex, Index, NumberBounds, NumberIndex, TextIndex, VectorIndex};
pub use model::{
    ChatMessage, ModelClient, ModelClientBuilder, OpenAiClient, ResponseFormat, StubModelClient,
};
pub use registry::Registry;
pub use spec::{
    compose_query_schema, Spec, SpecBuilder, SpecUnit, SubQuery, SYSTEM_PROMPT_TEMPLATE,
};
pub use worker::{TypedWorker, Worker};

/// Registry keys for the built-in model clients.
pub mod client_keys {
    pub const OPENAI: &str = "openai";
    pub const STUB: &str = "stub_ai";
}

/// Register the built-in model clients under their declaration keys.
pub fn register_default_clients(builder: &mut SpecBuilder) -> Result<()> {
    builder.register_model_client::<OpenAiClient>(client_keys::OPENAI)?;
    builder.register_model_client::<StubModelClient>(client_keys::STUB)?;
    Ok(())
}
