use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::ValidationError;

/// A single table value, exactly as the provider rendered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cell(String);

impl Cell {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, value: &str) -> bool {
        self.0 == value
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Column-ordered rows; every row has exactly one cell per column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabularResult {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl TabularResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self, ValidationError> {
        let expected = columns.len();
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != expected {
                return Err(ValidationError::RaggedRow {
                    row,
                    expected,
                    actual: cells.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Builds a table from raw provider rows, keeping the provider's column order.
    pub fn from_provider(
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Result<Self, ValidationError> {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Cell::from).collect())
            .collect();
        Self::new(columns, rows)
    }

    /// A table with columns and no rows.
    pub fn empty(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn column_values(&self, name: &str) -> Option<Vec<&Cell>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[index]).collect())
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.column_index(column)?;
        self.rows.get(row).map(|cells| &cells[index])
    }

    /// Projects onto `names` in the caller's order; unknown names are dropped.
    pub fn select(&self, names: &[String]) -> Self {
        let picked: Vec<(usize, &String)> = names
            .iter()
            .filter_map(|name| self.column_index(name).map(|index| (index, name)))
            .collect();

        Self {
            columns: picked.iter().map(|(_, name)| (*name).clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| picked.iter().map(|(index, _)| row[*index].clone()).collect())
                .collect(),
        }
    }

    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Cell]) -> bool,
    {
        Self {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| predicate(row))
                .cloned()
                .collect(),
        }
    }

    /// Single-column table of the distinct values in `column`, sorted by rendered text.
    pub fn distinct(&self, column: &str) -> Option<Self> {
        let index = self.column_index(column)?;
        let values: BTreeSet<String> = self.rows.iter().map(|row| row[index].to_string()).collect();
        Some(Self {
            columns: vec![column.to_owned()],
            rows: values.into_iter().map(|value| vec![Cell::from(value)]).collect(),
        })
    }

    pub fn rename_column(mut self, from: &str, to: &str) -> Self {
        if let Some(index) = self.column_index(from) {
            self.columns[index] = to.to_owned();
        }
        self
    }

    /// Keeps the first `limit` rows.
    pub fn truncated(&self, limit: usize) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(limit).cloned().collect(),
        }
    }
}
