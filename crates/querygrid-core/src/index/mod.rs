//! Index schema types
//!
//! An index is the declarative description of one searchable dimension of
//! the underlying dataset: a free-text description, optional worked
//! examples, and a numeric range where applicable. Its only job at run
//! time is to contribute a natural-language fragment to the system prompt;
//! the executable counterpart is the paired search engine.

mod boolean;
mod date;
mod number;
mod text;
mod vector;

pub use boolean::BoolIndex;
pub use date::DateIndex;
pub use number::{NumberBounds, NumberIndex};
pub use text::TextIndex;
pub use vector::VectorIndex;

use crate::error::Result;
use crate::spec::SpecBuilder;
use serde::Serialize;

/// One searchable dimension's self-description.
pub trait Index: Send + Sync {
    /// Natural-language context block for the system prompt.
    fn prompt(&self) -> String;
}

/// Register the built-in index schema types under their declaration keys.
pub fn register_defaults(builder: &mut SpecBuilder) -> Result<()> {
    builder.register_index::<TextIndex>("text_index")?;
    builder.register_index::<NumberIndex>("number_index")?;
    builder.register_index::<DateIndex>("date_index")?;
    builder.register_index::<BoolIndex>("boolean_index")?;
    builder.register_index::<VectorIndex>("vector_index")?;
    Ok(())
}

fn render_examples<T: Serialize>(examples: &[T]) -> Option<String> {
    if examples.is_empty() {
        return None;
    }
    serde_json::to_string(examples)
        .ok()
        .map(|rendered| format!("Examples: {rendered}"))
}
