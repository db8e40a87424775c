//! Pipeline error codes following a structured numbering system
//!
//! Error code ranges:
//! - COH0100-COH0199: Source errors (network, filesystem, timeouts)
//! - COH0200-COH0299: Input errors (CSV structure, encoding, table shape)
//! - COH0300-COH0399: Pattern and configuration errors
//! - COH0400-COH0499: Schema errors (columns, types, join keys)
//! - COH0500-COH0599: Run control (cancellation)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    pub const fn is_source_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    pub const fn is_input_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    pub const fn is_pattern_error(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }

    pub const fn is_schema_error(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "COH{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    map.insert(100, ErrorInfo::new("Source unavailable"));
    map.insert(101, ErrorInfo::new("Request timed out")
        .with_help("Increase `timeout_secs` or check connectivity to the base location"));
    map.insert(102, ErrorInfo::new("Unexpected response status"));
    map.insert(103, ErrorInfo::new("File not found"));

    map.insert(200, ErrorInfo::new("Malformed input"));
    map.insert(201, ErrorInfo::new("Inconsistent column count"));
    map.insert(202, ErrorInfo::new("Invalid UTF-8 encoding"));
    map.insert(203, ErrorInfo::new("Missing header row"));
    map.insert(204, ErrorInfo::new("Value does not match declared column type"));
    map.insert(205, ErrorInfo::new("Column length mismatch"));

    map.insert(300, ErrorInfo::new("Invalid pattern"));
    map.insert(301, ErrorInfo::new("Invalid temporal literal"));
    map.insert(302, ErrorInfo::new("Invalid configuration value"));

    map.insert(400, ErrorInfo::new("Schema mismatch"));
    map.insert(401, ErrorInfo::new("Unknown column")
        .with_help("Check the CSV header of the dataset"));
    map.insert(402, ErrorInfo::new("Type mismatch"));
    map.insert(403, ErrorInfo::new("Duplicate name"));
    map.insert(404, ErrorInfo::new("Unknown table"));

    map.insert(500, ErrorInfo::new("Run cancelled"));

    map
});

// Source errors
pub const COH0100: ErrorCode = ErrorCode::new(100);
pub const COH0101: ErrorCode = ErrorCode::new(101);
pub const COH0102: ErrorCode = ErrorCode::new(102);
pub const COH0103: ErrorCode = ErrorCode::new(103);

// Input errors
pub const COH0200: ErrorCode = ErrorCode::new(200);
pub const COH0201: ErrorCode = ErrorCode::new(201);
pub const COH0202: ErrorCode = ErrorCode::new(202);
pub const COH0203: ErrorCode = ErrorCode::new(203);
pub const COH0204: ErrorCode = ErrorCode::new(204);
pub const COH0205: ErrorCode = ErrorCode::new(205);

// Pattern errors
pub const COH0300: ErrorCode = ErrorCode::new(300);
pub const COH0301: ErrorCode = ErrorCode::new(301);
pub const COH0302: ErrorCode = ErrorCode::new(302);

// Schema errors
pub const COH0400: ErrorCode = ErrorCode::new(400);
pub const COH0401: ErrorCode = ErrorCode::new(401);
pub const COH0402: ErrorCode = ErrorCode::new(402);
pub const COH0403: ErrorCode = ErrorCode::new(403);
pub const COH0404: ErrorCode = ErrorCode::new(404);

// Run control
pub const COH0500: ErrorCode = ErrorCode::new(500);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(COH0100.to_string(), "COH0100");
        assert_eq!(COH0401.to_string(), "COH0401");
    }

    #[test]
    fn test_error_categories() {
        assert!(COH0101.is_source_error());
        assert!(!COH0101.is_input_error());

        assert!(COH0201.is_input_error());
        assert!(COH0300.is_pattern_error());
        assert!(COH0402.is_schema_error());
        assert!(!COH0500.is_schema_error());
    }

    #[test]
    fn test_error_info() {
        assert_eq!(COH0201.info().description, "Inconsistent column count");
        assert!(COH0401.info().help.is_some());
        assert_eq!(ErrorCode::new(999).info().description, "Unknown error");
    }
}
