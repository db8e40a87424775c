//! Typed columns
//!
//! A column is a name plus one typed vector. Each slot is an `Option`, the
//! `None` case being the null marker.

use crate::{DataType, Value};
use chrono::{NaiveDate, NaiveDateTime};

/// Typed column storage
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Boolean(Vec<Option<bool>>),
    Int64(Vec<Option<i64>>),
    Float64(Vec<Option<f64>>),
    Utf8(Vec<Option<String>>),
    Date(Vec<Option<NaiveDate>>),
    Timestamp(Vec<Option<NaiveDateTime>>),
}

macro_rules! each_variant {
    ($data:expr, $v:ident => $body:expr) => {
        match $data {
            ColumnData::Boolean($v) => $body,
            ColumnData::Int64($v) => $body,
            ColumnData::Float64($v) => $body,
            ColumnData::Utf8($v) => $body,
            ColumnData::Date($v) => $body,
            ColumnData::Timestamp($v) => $body,
        }
    };
}

impl ColumnData {
    /// Empty storage of the given type
    pub fn empty(data_type: DataType) -> Self {
        match data_type {
            DataType::Boolean => Self::Boolean(Vec::new()),
            DataType::Int64 => Self::Int64(Vec::new()),
            DataType::Float64 => Self::Float64(Vec::new()),
            DataType::Utf8 => Self::Utf8(Vec::new()),
            DataType::Date => Self::Date(Vec::new()),
            DataType::Timestamp => Self::Timestamp(Vec::new()),
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Self::Boolean(_) => DataType::Boolean,
            Self::Int64(_) => DataType::Int64,
            Self::Float64(_) => DataType::Float64,
            Self::Utf8(_) => DataType::Utf8,
            Self::Date(_) => DataType::Date,
            Self::Timestamp(_) => DataType::Timestamp,
        }
    }

    pub fn len(&self) -> usize {
        each_variant!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gather the given row positions into new storage
    ///
    /// # Panics
    ///
    /// Panics if any index is `>= self.len()`.
    pub fn take(&self, indices: &[usize]) -> Self {
        match self {
            Self::Boolean(v) => Self::Boolean(indices.iter().map(|&i| v[i]).collect()),
            Self::Int64(v) => Self::Int64(indices.iter().map(|&i| v[i]).collect()),
            Self::Float64(v) => Self::Float64(indices.iter().map(|&i| v[i]).collect()),
            Self::Utf8(v) => Self::Utf8(indices.iter().map(|&i| v[i].clone()).collect()),
            Self::Date(v) => Self::Date(indices.iter().map(|&i| v[i]).collect()),
            Self::Timestamp(v) => Self::Timestamp(indices.iter().map(|&i| v[i]).collect()),
        }
    }
}

/// A named, typed column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Build a text column from optional string slices
    pub fn utf8<'a>(name: impl Into<String>, values: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        Self::new(
            name,
            ColumnData::Utf8(values.into_iter().map(|v| v.map(str::to_string)).collect()),
        )
    }

    pub fn int64(name: impl Into<String>, values: impl IntoIterator<Item = Option<i64>>) -> Self {
        Self::new(name, ColumnData::Int64(values.into_iter().collect()))
    }

    pub fn float64(name: impl Into<String>, values: impl IntoIterator<Item = Option<f64>>) -> Self {
        Self::new(name, ColumnData::Float64(values.into_iter().collect()))
    }

    pub fn timestamp(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<NaiveDateTime>>,
    ) -> Self {
        Self::new(name, ColumnData::Timestamp(values.into_iter().collect()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn data_type(&self) -> DataType {
        self.data.data_type()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check whether the slot at `row` is null
    pub fn is_null(&self, row: usize) -> bool {
        each_variant!(&self.data, v => v[row].is_none())
    }

    /// Number of null slots
    pub fn null_count(&self) -> usize {
        each_variant!(&self.data, v => v.iter().filter(|x| x.is_none()).count())
    }

    /// Materialize the value at `row`
    pub fn value(&self, row: usize) -> Value {
        match &self.data {
            ColumnData::Boolean(v) => v[row].into(),
            ColumnData::Int64(v) => v[row].into(),
            ColumnData::Float64(v) => v[row].into(),
            ColumnData::Utf8(v) => v[row].clone().into(),
            ColumnData::Date(v) => v[row].into(),
            ColumnData::Timestamp(v) => v[row].into(),
        }
    }

    /// Text slot at `row`, `None` when null or not a text column
    pub fn str_at(&self, row: usize) -> Option<&str> {
        match &self.data {
            ColumnData::Utf8(v) => v[row].as_deref(),
            _ => None,
        }
    }

    /// Gather rows into a new column with the same name
    ///
    /// # Panics
    ///
    /// Panics if any index is `>= self.len()`.
    pub fn take(&self, indices: &[usize]) -> Self {
        Self {
            name: self.name.clone(),
            data: self.data.take(indices),
        }
    }

    /// Same data under a different name
    pub fn renamed(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: self.data,
        }
    }
}
