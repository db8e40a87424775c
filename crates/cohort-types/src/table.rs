//! Columnar tables
//!
//! A `Table` is an ordered set of uniquely named columns of equal length.
//! Tables are immutable: filtering, projection and joins build new tables.

use crate::{Column, DataType, Truth, Value};
use cohort_diagnostics::{CohortError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name and type of one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
}

/// Ordered list of fields
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|field| format!("{}: {}", field.name, field.data_type))
            .collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

/// In-memory columnar table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    index: IndexMap<String, usize>,
    num_rows: usize,
}

impl Table {
    /// Build a table, checking that names are unique and lengths agree
    pub fn try_new(columns: Vec<Column>) -> Result<Self> {
        let num_rows = columns.first().map_or(0, Column::len);
        let mut index = IndexMap::with_capacity(columns.len());

        for (position, column) in columns.iter().enumerate() {
            if column.len() != num_rows {
                return Err(CohortError::column_length_mismatch(
                    column.name(),
                    num_rows,
                    column.len(),
                ));
            }
            if index.insert(column.name().to_string(), position).is_some() {
                return Err(CohortError::duplicate_name("column", column.name()));
            }
        }

        Ok(Self {
            columns,
            index,
            num_rows,
        })
    }

    /// A table without columns or rows
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            index: IndexMap::new(),
            num_rows: 0,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index.get(name).map(|&i| &self.columns[i])
    }

    /// Look up a column by name, failing with `SchemaMismatch`
    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| CohortError::unknown_column(name))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    pub fn schema(&self) -> Schema {
        Schema {
            fields: self
                .columns
                .iter()
                .map(|c| Field {
                    name: c.name().to_string(),
                    data_type: c.data_type(),
                })
                .collect(),
        }
    }

    /// Materialize one row
    pub fn row(&self, row: usize) -> Vec<Value> {
        self.columns.iter().map(|c| c.value(row)).collect()
    }

    /// Iterate over materialized rows
    pub fn rows(&self) -> impl Iterator<Item = Vec<Value>> + '_ {
        (0..self.num_rows).map(|i| self.row(i))
    }

    /// Gather the given row positions into a new table
    ///
    /// Indices may repeat and appear in any order.
    ///
    /// # Panics
    ///
    /// Panics if any index is `>= self.num_rows()`. Use `try_take` for
    /// positions that are not known to be in range.
    pub fn take(&self, indices: &[usize]) -> Self {
        Self {
            columns: self.columns.iter().map(|c| c.take(indices)).collect(),
            index: self.index.clone(),
            num_rows: indices.len(),
        }
    }

    /// Checked `take`: fails with `SchemaMismatch` on an out-of-range index
    pub fn try_take(&self, indices: &[usize]) -> Result<Self> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.num_rows) {
            return Err(CohortError::schema_mismatch(format!(
                "row {bad} out of range for {} rows",
                self.num_rows
            )));
        }
        Ok(self.take(indices))
    }

    /// Keep rows whose mask entry is exactly `Truth::True`
    pub fn filter(&self, mask: &[Truth]) -> Result<Self> {
        if mask.len() != self.num_rows {
            return Err(CohortError::schema_mismatch(format!(
                "filter mask has {} entries for {} rows",
                mask.len(),
                self.num_rows
            )));
        }
        let keep: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.is_true().then_some(i))
            .collect();
        Ok(self.take(&keep))
    }

    /// Keep the named columns, in the given order
    pub fn project(&self, names: &[&str]) -> Result<Self> {
        let columns = names
            .iter()
            .map(|name| self.require_column(name).cloned())
            .collect::<Result<Vec<_>>>()?;
        Self::try_new(columns)
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> Self {
        let indices: Vec<usize> = (0..n.min(self.num_rows)).collect();
        self.take(&indices)
    }
}
