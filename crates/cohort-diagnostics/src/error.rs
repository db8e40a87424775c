//! Pipeline error types

use crate::{
    COH0100, COH0200, COH0201, COH0205, COH0300, COH0301, COH0400, COH0401, COH0402, COH0403,
    COH0404, COH0500, ErrorCode,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Broad error category, independent of the concrete code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    SourceUnavailable,
    MalformedInput,
    InvalidPattern,
    SchemaMismatch,
    Cancelled,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::SourceUnavailable => write!(f, "source unavailable"),
            ErrorKind::MalformedInput => write!(f, "malformed input"),
            ErrorKind::InvalidPattern => write!(f, "invalid pattern"),
            ErrorKind::SchemaMismatch => write!(f, "schema mismatch"),
            ErrorKind::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Main pipeline error type
///
/// Every variant is fatal to a run. Row-level problems (unparseable dates,
/// null join keys) never surface here.
#[derive(Debug, Clone, Error)]
pub enum CohortError {
    /// Retrieval of a dataset failed (network, path, timeout, status)
    #[error("{code}: {message}")]
    SourceUnavailable {
        code: ErrorCode,
        message: String,
        location: String,
    },

    /// The CSV (or a table built from it) is structurally invalid
    #[error("{code}: {message}")]
    MalformedInput {
        code: ErrorCode,
        message: String,
        dataset: Option<String>,
        line: Option<u64>,
    },

    /// A date pattern, temporal literal or configuration value is invalid
    #[error("{code}: {message}")]
    InvalidPattern {
        code: ErrorCode,
        message: String,
        pattern: String,
    },

    /// A predicate, join or registry operation does not fit the table schema
    #[error("{code}: {message}")]
    SchemaMismatch {
        code: ErrorCode,
        message: String,
        context: Option<String>,
    },

    /// The run was cancelled between stages
    #[error("{code}: run cancelled before {stage}")]
    Cancelled { code: ErrorCode, stage: String },
}

impl CohortError {
    /// Create a source error for the given location
    pub fn source_unavailable(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            code: COH0100,
            message: message.into(),
            location: location.into(),
        }
    }

    /// Create a source error with a specific code
    pub fn source_unavailable_with(
        code: ErrorCode,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::SourceUnavailable {
            code,
            message: message.into(),
            location: location.into(),
        }
    }

    /// Create a malformed input error
    pub fn malformed(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            code,
            message: message.into(),
            dataset: None,
            line: None,
        }
    }

    /// Create an error for a record whose field count differs from the header
    pub fn inconsistent_columns(expected: usize, found: usize, line: Option<u64>) -> Self {
        Self::MalformedInput {
            code: COH0201,
            message: format!("expected {expected} fields, found {found}"),
            dataset: None,
            line,
        }
    }

    /// Create an error for columns of unequal length
    pub fn column_length_mismatch(column: &str, expected: usize, found: usize) -> Self {
        Self::malformed(
            COH0205,
            format!("column '{column}' has {found} rows, expected {expected}"),
        )
    }

    /// Create an invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        let pattern = pattern.into();
        Self::InvalidPattern {
            code: COH0300,
            message: format!("invalid pattern '{}': {}", pattern, message.into()),
            pattern,
        }
    }

    /// Create an error for a temporal literal that does not match its pattern
    pub fn invalid_temporal_literal(literal: impl Into<String>, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        Self::InvalidPattern {
            code: COH0301,
            message: format!(
                "literal '{}' does not match pattern '{}'",
                literal.into(),
                pattern
            ),
            pattern,
        }
    }

    /// Create an invalid pattern error with a specific code
    pub fn invalid_config(code: ErrorCode, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            code,
            message: message.into(),
            pattern: value.into(),
        }
    }

    /// Create a generic schema mismatch
    pub fn schema_mismatch(message: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            code: COH0400,
            message: message.into(),
            context: None,
        }
    }

    /// Create an error for a column that is absent from a table
    pub fn missing_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        let table = table.into();
        Self::SchemaMismatch {
            code: COH0401,
            message: format!("column '{}' not found in '{}'", column.into(), table),
            context: Some(table),
        }
    }

    /// Create an error for an unknown column when the table name is not known
    pub fn unknown_column(column: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            code: COH0401,
            message: format!("column '{}' not found", column.into()),
            context: None,
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            code: COH0402,
            message: format!("type mismatch: expected {}, found {}", expected.into(), found.into()),
            context: None,
        }
    }

    /// Create a duplicate name error
    pub fn duplicate_name(kind: &str, name: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            code: COH0403,
            message: format!("duplicate {} '{}'", kind, name.into()),
            context: None,
        }
    }

    /// Create an error for a table name that is not registered
    pub fn unknown_table(name: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            code: COH0404,
            message: format!("table '{}' is not registered", name.into()),
            context: None,
        }
    }

    /// Create a cancellation error
    pub fn cancelled(stage: impl Into<String>) -> Self {
        Self::Cancelled {
            code: COH0500,
            stage: stage.into(),
        }
    }

    /// Attach the dataset name to a malformed input error
    pub fn in_dataset(self, name: &str) -> Self {
        match self {
            Self::MalformedInput { code, message, line, .. } => Self::MalformedInput {
                code,
                message,
                dataset: Some(name.to_string()),
                line,
            },
            Self::SchemaMismatch { code, message, context: None } => Self::SchemaMismatch {
                code,
                message,
                context: Some(name.to_string()),
            },
            other => other,
        }
    }

    /// Get the error category
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SourceUnavailable { .. } => ErrorKind::SourceUnavailable,
            Self::MalformedInput { .. } => ErrorKind::MalformedInput,
            Self::InvalidPattern { .. } => ErrorKind::InvalidPattern,
            Self::SchemaMismatch { .. } => ErrorKind::SchemaMismatch,
            Self::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::SourceUnavailable { code, .. }
            | Self::MalformedInput { code, .. }
            | Self::InvalidPattern { code, .. }
            | Self::SchemaMismatch { code, .. }
            | Self::Cancelled { code, .. } => *code,
        }
    }

    /// One-line description including location details when present
    pub fn detail(&self) -> String {
        match self {
            Self::SourceUnavailable { location, .. } => format!("{self} ({location})"),
            Self::MalformedInput { dataset, line, .. } => match (dataset, line) {
                (Some(dataset), Some(line)) => format!("{self} ({dataset}, line {line})"),
                (Some(dataset), None) => format!("{self} ({dataset})"),
                (None, Some(line)) => format!("{self} (line {line})"),
                (None, None) => self.to_string(),
            },
            Self::SchemaMismatch { context: Some(ctx), .. } => format!("{self} [{ctx}]"),
            _ => self.to_string(),
        }
    }
}

impl From<ErrorKind> for ErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::SourceUnavailable => COH0100,
            ErrorKind::MalformedInput => COH0200,
            ErrorKind::InvalidPattern => COH0300,
            ErrorKind::SchemaMismatch => COH0400,
            ErrorKind::Cancelled => COH0500,
        }
    }
}
