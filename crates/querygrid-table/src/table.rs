//! CSV table access and shared result types

use querygrid_core::{QueryGridError, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

/// Set of matching row ids, ordered by position in the source file.
///
/// The shared result type of every table search engine: engines return
/// row ids, the aggregator intersects and unions them before
/// materializing rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSet(BTreeSet<usize>);

impl RowSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, row: usize) {
        self.0.insert(row);
    }

    pub fn contains(&self, row: usize) -> bool {
        self.0.contains(&row)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn intersection(&self, other: &RowSet) -> RowSet {
        RowSet(self.0.intersection(&other.0).copied().collect())
    }

    pub fn union(&self, other: &RowSet) -> RowSet {
        RowSet(self.0.union(&other.0).copied().collect())
    }
}

impl FromIterator<usize> for RowSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        RowSet(iter.into_iter().collect())
    }
}

/// One materialized CSV record, keyed by column name.
pub type Row = BTreeMap<String, String>;

/// Final answer of the table aggregator: the matching rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRows(pub Vec<Row>);

impl TableRows {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.0.iter()
    }
}

/// Config shared by every table search engine: which file, which column.
#[derive(Debug, Clone, Deserialize)]
pub struct TableEngineConfig {
    pub file_path: String,
    pub column_name: String,
}

/// Read one column's values, row id = record position.
pub fn load_column(config: &TableEngineConfig) -> Result<Vec<String>> {
    let mut reader = open_reader(&config.file_path)?;
    let headers = reader
        .headers()
        .map_err(|e| csv_error(&config.file_path, e))?;
    let column = headers
        .iter()
        .position(|header| header == config.column_name)
        .ok_or_else(|| {
            QueryGridError::Engine(format!(
                "column '{}' not found in '{}'",
                config.column_name, config.file_path
            ))
        })?;

    let mut values = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(&config.file_path, e))?;
        values.push(record.get(column).unwrap_or_default().to_string());
    }
    Ok(values)
}

/// Read the whole table as name-keyed rows.
pub fn load_rows(file_path: &str) -> Result<Vec<Row>> {
    let mut reader = open_reader(file_path)?;
    let headers = reader
        .headers()
        .map_err(|e| csv_error(file_path, e))?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(file_path, e))?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn open_reader(file_path: &str) -> Result<csv::Reader<std::fs::File>> {
    csv::Reader::from_path(file_path).map_err(|e| csv_error(file_path, e))
}

fn csv_error(file_path: &str, e: csv::Error) -> QueryGridError {
    QueryGridError::Engine(format!("failed to read '{file_path}': {e}"))
}
