//! Date range search engine over a CSV column
//!
//! Dates are parsed as `%Y-%m-%d` in both the table and the model's
//! arguments; bounds are inclusive and a null side is open.

use crate::table::{load_column, RowSet, TableEngineConfig};
use async_trait::async_trait;
use chrono::NaiveDate;
use querygrid_core::{QueryGridError, Result, SearchArguments, SearchEngine};
use serde::Deserialize;
use serde_json::{json, Value};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Deserialize)]
pub struct DateRange {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateArguments {
    pub date_ranges: Vec<DateRange>,
}

fn parse_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| format!("'{raw}' is not a {DATE_FORMAT} date"))
}

impl SearchArguments for DateArguments {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "date_ranges": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "start_date": {
                                "type": ["string", "null"],
                                "description": "Inclusive start, YYYY-MM-DD, or null for open.",
                            },
                            "end_date": {
                                "type": ["string", "null"],
                                "description": "Inclusive end, YYYY-MM-DD, or null for open.",
                            },
                        },
                        "required": ["start_date", "end_date"],
                        "additionalProperties": false,
                    },
                    "description": "List of inclusive date ranges.",
                }
            },
            "required": ["date_ranges"],
            "additionalProperties": false,
        })
    }

    fn validate(&self) -> std::result::Result<(), String> {
        for range in &self.date_ranges {
            let start = range.start_date.as_deref().map(parse_date).transpose()?;
            let end = range.end_date.as_deref().map(parse_date).transpose()?;
            match (start, end) {
                (None, None) => {
                    return Err("start_date and end_date cannot both be null".to_string())
                }
                (Some(start), Some(end)) if start > end => {
                    return Err(format!(
                        "start_date {start} must not be after end_date {end}"
                    ))
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Matches rows whose date falls in any requested range. An empty range
/// list means no date constraint, every row matches.
#[derive(Debug, Clone, Deserialize)]
pub struct DateSearchEngine {
    #[serde(flatten)]
    pub config: TableEngineConfig,
}

#[async_trait]
impl SearchEngine for DateSearchEngine {
    type Arguments = DateArguments;
    type Result = RowSet;

    fn from_config(config: &Value) -> Result<Self> {
        serde_json::from_value(config.clone())
            .map_err(|e| QueryGridError::Schema(format!("date search engine config: {e}")))
    }

    async fn search(&self, arguments: DateArguments) -> Result<RowSet> {
        let column = load_column(&self.config)?;
        if arguments.date_ranges.is_empty() {
            return Ok((0..column.len()).collect());
        }

        // validate() already proved these parse
        let mut ranges = Vec::with_capacity(arguments.date_ranges.len());
        for range in &arguments.date_ranges {
            let start = range
                .start_date
                .as_deref()
                .map(parse_date)
                .transpose()
                .map_err(QueryGridError::Validation)?;
            let end = range
                .end_date
                .as_deref()
                .map(parse_date)
                .transpose()
                .map_err(QueryGridError::Validation)?;
            ranges.push((start, end));
        }

        let mut rows = RowSet::new();
        for (row, raw) in column.iter().enumerate() {
            let value = parse_date(raw).map_err(|reason| {
                QueryGridError::Engine(format!(
                    "column '{}' row {row}: {reason}",
                    self.config.column_name
                ))
            })?;
            let matched = ranges.iter().any(|(start, end)| {
                start.map_or(true, |start| value >= start)
                    && end.map_or(true, |end| value <= end)
            });
            if matched {
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

    fn engine(dir: &tempfile::TempDir) -> DateSearchEngine {
        let path = dir.path().join("books.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"published\n1925-04-10\n1881-11-01\n1597-01-01\n")
            .unwrap();
        DateSearchEngine::from_config(&json!({
            "file_path": path.to_string_lossy(),
            "column_name": "published",
        }))
        .unwrap()
    }

    fn ranges(pairs: &[(Option<&str>, Option<&str>)]) -> DateArguments {
        DateArguments {
            date_ranges: pairs
                .iter()
                .map(|&(start, end)| DateRange {
                    start_date: start.map(str::to_string),
                    end_date: end.map(str::to_string),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_inclusive_date_bounds() {
        let dir = tempfile::TempDir::new().unwrap();
        let rows = engine(&dir)
            .search(ranges(&[(Some("1881-11-01"), Some("1925-04-10"))]))
            .await
            .unwrap();
        assert_eq!(rows, [0, 1].into_iter().collect());
    }

    #[tokio::test]
    async fn test_open_start_side() {
        let dir = tempfile::TempDir::new().unwrap();
        let rows = engine(&dir)
            .search(ranges(&[(None, Some("1600-01-01"))]))
            .await
            .unwrap();
        assert_eq!(rows, [2].into_iter().collect());
    }

    #[tokio::test]
    async fn test_empty_ranges_match_all_rows() {
        let dir = tempfile::TempDir::new().unwrap();
        let rows = engine(&dir).search(ranges(&[])).await.unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_validate_rejects_inverted_and_malformed_ranges() {
        assert!(ranges(&[(Some("2001-01-01"), Some("2000-01-01"))])
            .validate()
            .is_err());
        assert!(ranges(&[(None, None)]).validate().is_err());
        assert!(ranges(&[(Some("01/02/2000"), None)]).validate().is_err());
        assert!(ranges(&[(Some("2000-01-01"), None)]).validate().is_ok());
    }
}
