//! Text index schema

use super::{render_examples, Index};
use serde::{Deserialize, Serialize};

/// Index over a free-text column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextIndex {
    pub description: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

impl Index for TextIndex {
    fn prompt(&self) -> String {
        let mut lines = vec![format!("Description: {}", self.description)];
        if let Some(examples) = render_examples(&self.examples) {
            lines.push(examples);
        }
        lines.join("\n")
    }
}
