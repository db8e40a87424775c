//! Column data types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic type of a column or value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Boolean
    Boolean,
    /// 64-bit signed integer
    Int64,
    /// 64-bit float
    Float64,
    /// UTF-8 text
    Utf8,
    /// Calendar date without time
    Date,
    /// Date and time without zone (session local)
    Timestamp,
}

impl DataType {
    /// Get the simple name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Utf8 => "utf8",
            Self::Date => "date",
            Self::Timestamp => "timestamp",
        }
    }

    /// Check if this type is numeric
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int64 | Self::Float64)
    }

    /// Check if this type is temporal
    pub const fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::Timestamp)
    }

    /// Check whether values of the two types can be compared with each other
    pub const fn is_comparable_with(&self, other: &DataType) -> bool {
        match (self, other) {
            (Self::Int64 | Self::Float64, Self::Int64 | Self::Float64) => true,
            (Self::Date | Self::Timestamp, Self::Date | Self::Timestamp) => true,
            (Self::Boolean, Self::Boolean) | (Self::Utf8, Self::Utf8) => true,
            _ => false,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
