//! Boolean index schema

use super::Index;
use serde::{Deserialize, Serialize};

/// Index over a boolean column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoolIndex {
    pub description: String,
}

impl Index for BoolIndex {
    fn prompt(&self) -> String {
        format!("Description: {}", self.description)
    }
}
