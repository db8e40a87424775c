//! Operator Implementations
//!
//! Each module adds `eval_*` methods to `Evaluator` for one category:
//! - Comparison operators (Compare, IsNull, IsNotNull)
//! - Logical operators (And, Or, Not)
//! - Temporal operators (pattern parsing and timestamp comparison)
//! - Clinical operators (age range)

pub mod clinical;
pub mod comparison;
pub mod logical;
pub mod temporal;

// Re-export helper functions
pub use clinical::age_in_years;
pub use temporal::{parse_dates, parse_timestamps};
