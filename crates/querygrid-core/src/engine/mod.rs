//! Search engine contracts
//!
//! Search engines are written against the typed [`SearchEngine`] trait, so
//! the compiler enforces the argument and result shapes for each concrete
//! engine. The assembler and executor work with the object-safe
//! [`DynSearchEngine`] form, which erases those types behind JSON payloads
//! and [`ResultHandle`]s while keeping enough metadata (`TypeId` + type
//! name) for the assembly-time compatibility check and for readable
//! mismatch errors.

use crate::error::{QueryGridError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::{type_name, Any, TypeId};

/// Typed argument payload for one search engine.
///
/// The JSON-schema fragment returned by [`SearchArguments::schema`] is
/// embedded into the composite query schema sent to the model, so field
/// descriptions written here are what the model sees.
pub trait SearchArguments: DeserializeOwned + Send + 'static {
    /// JSON-schema fragment describing this argument shape.
    fn schema() -> Value;

    /// Semantic validation beyond what deserialization enforces.
    ///
    /// Runs before any search executes; a failing check rejects the whole
    /// model response.
    fn validate(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

/// A search engine: the executable counterpart of an index.
#[async_trait]
pub trait SearchEngine: Sized + Send + Sync + 'static {
    /// Typed per-query arguments filled in by the model.
    type Arguments: SearchArguments;

    /// Result set type, shared by every engine in one assembled spec.
    type Result: Send + Sync + 'static;

    /// Construct the engine from its declared config mapping.
    fn from_config(config: &Value) -> Result<Self>;

    /// Evaluate one sub-query's arguments against the underlying data.
    async fn search(&self, arguments: Self::Arguments) -> Result<Self::Result>;
}

/// Type-erased search result produced by [`DynSearchEngine::search`].
pub struct ResultHandle {
    value: Box<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl ResultHandle {
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            value: Box::new(value),
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Recover the concrete result value.
    pub fn downcast<T: 'static>(self) -> Result<T> {
        let found = self.type_name;
        self.value
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| {
                QueryGridError::TypeMismatch(format!(
                    "expected result type '{}', found '{}'",
                    type_name::<T>(),
                    found
                ))
            })
    }
}

impl std::fmt::Debug for ResultHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultHandle")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Arguments already deserialized and validated for a specific engine.
///
/// Produced by [`DynSearchEngine::parse_arguments`] and consumed by
/// [`DynSearchEngine::search`] on the same engine instance.
pub struct ParsedArguments(Box<dyn Any + Send>);

impl std::fmt::Debug for ParsedArguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ParsedArguments").finish_non_exhaustive()
    }
}

/// Object-safe form of [`SearchEngine`] used by the spec and executor.
#[async_trait]
pub trait DynSearchEngine: Send + Sync {
    /// JSON-schema fragment for this engine's argument shape.
    fn arguments_schema(&self) -> Value;

    /// Deserialize and validate one sub-query's argument payload.
    fn parse_arguments(&self, payload: &Value) -> Result<ParsedArguments>;

    /// Run the search with previously parsed arguments.
    async fn search(&self, arguments: ParsedArguments) -> Result<ResultHandle>;

    fn result_type(&self) -> TypeId;

    fn result_type_name(&self) -> &'static str;
}

/// Adapter erasing a typed [`SearchEngine`] into a [`DynSearchEngine`].
pub(crate) struct ErasedSearchEngine<E: SearchEngine> {
    inner: E,
}

impl<E: SearchEngine> ErasedSearchEngine<E> {
    pub(crate) fn new(inner: E) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<E: SearchEngine> DynSearchEngine for ErasedSearchEngine<E> {
    fn arguments_schema(&self) -> Value {
        E::Arguments::schema()
    }

    fn parse_arguments(&self, payload: &Value) -> Result<ParsedArguments> {
        let arguments: E::Arguments = serde_json::from_value(payload.clone())
            .map_err(|e| QueryGridError::Validation(format!("invalid search arguments: {e}")))?;
        arguments.validate().map_err(QueryGridError::Validation)?;
        Ok(ParsedArguments(Box::new(arguments)))
    }

    async fn search(&self, arguments: ParsedArguments) -> Result<ResultHandle> {
        let arguments = arguments.0.downcast::<E::Arguments>().map_err(|_| {
            QueryGridError::TypeMismatch(format!(
                "arguments were parsed for a different engine than '{}'",
                type_name::<E>()
            ))
        })?;
        let result = self.inner.search(*arguments).await?;
        Ok(ResultHandle::new(result))
    }

    fn result_type(&self) -> TypeId {
        TypeId::of::<E::Result>()
    }

    fn result_type_name(&self) -> &'static str {
        type_name::<E::Result>()
    }
}
