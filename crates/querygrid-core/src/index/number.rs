//! Number index schema

use super::{render_examples, Index};
use serde::{Deserialize, Serialize};

/// Inclusive bounds of the values present in a numeric column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NumberBounds {
    pub min: f64,
    pub max: f64,
}

/// Index over a numeric column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberIndex {
    pub description: String,
    pub range: NumberBounds,
    #[serde(default)]
    pub examples: Vec<f64>,
}

impl Index for NumberIndex {
    fn prompt(&self) -> String {
        let mut lines = vec![
            format!("Description: {}", self.description),
            format!("Range: {} to {}", self.range.min, self.range.max),
        ];
        if let Some(examples) = render_examples(&self.examples) {
            lines.push(examples);
        }
        lines.join("\n")
    }
}
