//! Date index schema

use super::{render_examples, Index};
use serde::{Deserialize, Serialize};

/// Index over a date column; examples are ISO-8601 date strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateIndex {
    pub description: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

impl Index for DateIndex {
    fn prompt(&self) -> String {
        let mut lines = vec![format!("Description: {}", self.description)];
        if let Some(examples) = render_examples(&self.examples) {
            lines.push(examples);
        }
        lines.join("\n")
    }
}
