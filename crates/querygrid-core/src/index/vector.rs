//! Vector index schema

use super::{render_examples, Index};
use serde::{Deserialize, Serialize};

/// Index over an embedded column queried by natural-language similarity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    pub description: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

impl Index for VectorIndex {
    fn prompt(&self) -> String {
        let mut lines = vec![format!("Description: {}", self.description)];
        if let Some(examples) = render_examples(&self.examples) {
            lines.push(examples);
        }
        lines.join("\n")
    }
}
