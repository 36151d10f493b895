//! Row-set aggregation and materialization
//!
//! Sub-queries are alternatives, so their row sets union; within one
//! sub-query every index constrains the same rows, so they intersect.

use crate::table::{load_rows, RowSet, TableRows};
use async_trait::async_trait;
use querygrid_core::{Aggregator, ExecutionResult, QueryGridError, Result};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct TableAggregator {
    pub file_path: String,
}

impl TableAggregator {
    fn combine(tasks: &[ExecutionResult<RowSet>]) -> RowSet {
        let mut matched = RowSet::new();
        for task in tasks {
            let mut within: Option<RowSet> = None;
            for (_, rows) in &task.results {
                within = Some(match within {
                    Some(acc) => acc.intersection(rows),
                    None => rows.clone(),
                });
            }
            if let Some(within) = within {
                matched = matched.union(&within);
            }
        }
        matched
    }
}

#[async_trait]
impl Aggregator for TableAggregator {
    type Input = RowSet;
    type Output = TableRows;

    fn from_config(config: &Value) -> Result<Self> {
        serde_json::from_value(config.clone())
            .map_err(|e| QueryGridError::Schema(format!("table aggregator config: {e}")))
    }

    async fn aggregate(&self, tasks: Vec<ExecutionResult<RowSet>>) -> Result<TableRows> {
        let matched = Self::combine(&tasks);
        tracing::debug!(
            sub_queries = tasks.len(),
            rows = matched.len(),
            "aggregated row sets"
        );
        if matched.is_empty() {
            return Ok(TableRows::default());
        }

        let all_rows = load_rows(&self.file_path)?;
        let rows = matched
            .iter()
            .filter_map(|row| all_rows.get(row).cloned())
            .collect();
        Ok(TableRows(rows))
    }
}
