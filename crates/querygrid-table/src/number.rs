//! Numeric range search engine over a CSV column

use crate::table::{load_column, RowSet, TableEngineConfig};
use async_trait::async_trait;
use querygrid_core::{QueryGridError, Result, SearchArguments, SearchEngine};
use serde::Deserialize;
use serde_json::{json, Value};

/// Inclusive bounds; an open side matches everything on that side.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct NumberRange {
    pub start_number: Option<f64>,
    pub end_number: Option<f64>,
}

impl NumberRange {
    fn contains(&self, value: f64) -> bool {
        self.start_number.map_or(true, |start| value >= start)
            && self.end_number.map_or(true, |end| value <= end)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NumberArguments {
    pub number_ranges: Vec<NumberRange>,
}

impl SearchArguments for NumberArguments {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "number_ranges": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "start_number": {"type": ["number", "null"]},
                            "end_number": {"type": ["number", "null"]},
                        },
                        "required": ["start_number", "end_number"],
                        "additionalProperties": false,
                    },
                    "description": "List of inclusive number ranges; null leaves a side open.",
                }
            },
            "required": ["number_ranges"],
            "additionalProperties": false,
        })
    }

    fn validate(&self) -> std::result::Result<(), String> {
        for range in &self.number_ranges {
            if range.start_number.is_none() && range.end_number.is_none() {
                return Err("start_number and end_number cannot both be null".to_string());
            }
            if let (Some(start), Some(end)) = (range.start_number, range.end_number) {
                if start > end {
                    return Err(format!(
                        "start_number {start} must be less than or equal to end_number {end}"
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Matches rows whose numeric value falls in any requested range.
/// An empty range list means no numeric constraint, every row matches.
#[derive(Debug, Clone, Deserialize)]
pub struct NumberSearchEngine {
    #[serde(flatten)]
    pub config: TableEngineConfig,
}

#[async_trait]
impl SearchEngine for NumberSearchEngine {
    type Arguments = NumberArguments;
    type Result = RowSet;

    fn from_config(config: &Value) -> Result<Self> {
        serde_json::from_value(config.clone()).map_err(|e| {
            QueryGridError::Schema(format!("number search engine config: {e}"))
        })
    }

    async fn search(&self, arguments: NumberArguments) -> Result<RowSet> {
        let column = load_column(&self.config)?;
        if arguments.number_ranges.is_empty() {
            return Ok((0..column.len()).collect());
        }

        let mut rows = RowSet::new();
        for (row, raw) in column.iter().enumerate() {
            let value: f64 = raw.trim().parse().map_err(|_| {
                QueryGridError::Engine(format!(
                    "column '{}' row {row}: '{raw}' is not a number",
                    self.config.column_name
                ))
            })?;
            if arguments
                .number_ranges
                .iter()
                .any(|range| range.contains(value))
            {
                rows.insert(row);
            }
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn engine(dir: &tempfile::TempDir) -> NumberSearchEngine {
        let path = dir.path().join("books.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"price\n10\n0\n25.5\n").unwrap();
        NumberSearchEngine::from_config(&json!({
            "type": "number_search",
            "file_path": path.to_string_lossy(),
            "column_name": "price",
        }))
        .unwrap()
    }

    fn ranges(pairs: &[(Option<f64>, Option<f64>)]) -> NumberArguments {
        NumberArguments {
            number_ranges: pairs
                .iter()
                .map(|&(start_number, end_number)| NumberRange {
                    start_number,
                    end_number,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_inclusive_bounds() {
        let dir = tempfile::TempDir::new().unwrap();
        let rows = engine(&dir)
            .search(ranges(&[(Some(0.0), Some(10.0))]))
            .await
            .unwrap();
        assert_eq!(rows, [0, 1].into_iter().collect());
    }

    #[tokio::test]
    async fn test_zero_bound_is_honored() {
        // A zero start is a real constraint, not an open side.
        let dir = tempfile::TempDir::new().unwrap();
        let rows = engine(&dir)
            .search(ranges(&[(Some(0.0), None)]))
            .await
            .unwrap();
        assert_eq!(rows.len(), 3);
        let rows = engine(&dir)
            .search(ranges(&[(None, Some(0.0))]))
            .await
            .unwrap();
        assert_eq!(rows, [1].into_iter().collect());
    }

    #[tokio::test]
    async fn test_empty_ranges_match_all_rows() {
        let dir = tempfile::TempDir::new().unwrap();
        let rows = engine(&dir).search(ranges(&[])).await.unwrap();
        assert_eq!(rows, [0, 1, 2].into_iter().collect());
    }

    #[tokio::test]
    async fn test_multiple_ranges_union() {
        let dir = tempfile::TempDir::new().unwrap();
        let rows = engine(&dir)
            .search(ranges(&[(Some(9.0), Some(11.0)), (Some(25.0), Some(26.0))]))
            .await
            .unwrap();
        assert_eq!(rows, [0, 2].into_iter().collect());
    }

    #[tokio::test]
    async fn test_non_numeric_cell_is_engine_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"price\nten\n").unwrap();
        let engine = NumberSearchEngine::from_config(&json!({
            "file_path": path.to_string_lossy(),
            "column_name": "price",
        }))
        .unwrap();
        let err = engine
            .search(ranges(&[(Some(0.0), Some(1.0))]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not a number"));
    }

    #[test]
    fn test_validate_rejects_degenerate_ranges() {
        assert!(ranges(&[(None, None)]).validate().is_err());
        assert!(ranges(&[(Some(5.0), Some(2.0))]).validate().is_err());
        assert!(ranges(&[(Some(2.0), Some(2.0))]).validate().is_ok());
    }
}
