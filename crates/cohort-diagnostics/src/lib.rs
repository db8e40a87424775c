//! Cohort pipeline diagnostics and error handling
//!
//! This crate provides the error taxonomy shared by every pipeline crate:
//! structured error codes and the fatal `CohortError` kinds.

mod error;
mod error_code;

pub use error::*;
pub use error_code::*;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, CohortError>;
